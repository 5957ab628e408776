// THEORY (BGR Pixel):
// The `Pixel` module is the most fundamental unit of the system. Video decoders
// hand us interleaved 8-bit BGR samples; everything downstream of this module works
// on a single intensity channel. A `BgrPixel` is a "dumb" data container for one
// such sample plus the single heuristic we need from it: its luma.
//
// Luma uses the Rec. 601 weights in the same 14-bit fixed-point form OpenCV's
// `BGR2GRAY` conversion uses, so a frame converted here and a frame converted by
// OpenCV agree to the last bit.

pub mod pixel {
    pub type Channel = u8;
    pub type Intensity = u8;

    pub const CHANNELS: usize = 3;

    const FIXED_POINT_SHIFT: u32 = 14;
    const RED_WEIGHT: u32 = 4899; // 0.299 * 2^14
    const GREEN_WEIGHT: u32 = 9617; // 0.587 * 2^14
    const BLUE_WEIGHT: u32 = 1868; // 0.114 * 2^14

    /// A single pixel in the blue, green, red byte order produced by video decoders.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct BgrPixel {
        pub blue: Channel,
        pub green: Channel,
        pub red: Channel,
    }

    impl BgrPixel {
        pub fn new(blue: Channel, green: Channel, red: Channel) -> Self {
            Self { blue, green, red }
        }

        /// Rec. 601 luma, rounded to the nearest integer.
        pub fn luminance(&self) -> Intensity {
            let weighted = self.blue as u32 * BLUE_WEIGHT
                + self.green as u32 * GREEN_WEIGHT
                + self.red as u32 * RED_WEIGHT;
            let rounded = (weighted + (1 << (FIXED_POINT_SHIFT - 1))) >> FIXED_POINT_SHIFT;
            rounded.min(Intensity::MAX as u32) as Intensity
        }
    }

    impl From<[Channel; CHANNELS]> for BgrPixel {
        fn from(bytes: [Channel; CHANNELS]) -> Self {
            BgrPixel::new(bytes[0], bytes[1], bytes[2])
        }
    }
}
