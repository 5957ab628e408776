// THEORY:
// Thermal sensors are noisy; a single hot pixel must not become a region of its own.
// Before thresholding, every frame is smoothed with a separable Gaussian kernel.
//
// Kernel and border conventions:
// 1.  **Truncation**: the kernel extends `floor(4 * sigma + 0.5)` samples each way and
//     is normalised to sum to one.
// 2.  **Reflect borders**: samples past an edge mirror the image including the edge
//     sample itself (`d c b a | a b c d | d c b a`), so a uniform image stays uniform.
// 3.  **Separable, 8-bit between passes**: the vertical pass runs first, its output is
//     truncated back to `u8`, then the horizontal pass runs on that result.

pub mod gaussian {
    use image::GrayImage;

    pub const DEFAULT_SIGMA: f64 = 1.5;
    const TRUNCATE: f64 = 4.0;

    /// Builds the normalised 1-D kernel for `sigma`. Index `radius` is the centre tap.
    pub fn kernel(sigma: f64) -> Vec<f64> {
        let radius = (TRUNCATE * sigma + 0.5) as usize;
        let variance = sigma * sigma;
        let mut weights: Vec<f64> = (0..=2 * radius)
            .map(|i| {
                let x = i as f64 - radius as f64;
                (-0.5 * x * x / variance).exp()
            })
            .collect();
        let total: f64 = weights.iter().sum();
        for w in &mut weights {
            *w /= total;
        }
        weights
    }

    /// Smooths `image` with a Gaussian of the given spread. A non-positive sigma
    /// returns an unmodified copy.
    pub fn smooth(image: &GrayImage, sigma: f64) -> GrayImage {
        if sigma <= 0.0 || image.width() == 0 || image.height() == 0 {
            return image.clone();
        }

        let weights = kernel(sigma);
        let (width, height) = image.dimensions();

        let mut vertical = GrayImage::new(width, height);
        for x in 0..width {
            for y in 0..height {
                let value = convolve_at(&weights, y as isize, height as usize, |i| {
                    image.get_pixel(x, i as u32).0[0]
                });
                vertical.put_pixel(x, y, image::Luma([value]));
            }
        }

        let mut smoothed = GrayImage::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let value = convolve_at(&weights, x as isize, width as usize, |i| {
                    vertical.get_pixel(i as u32, y).0[0]
                });
                smoothed.put_pixel(x, y, image::Luma([value]));
            }
        }

        smoothed
    }

    fn convolve_at<F>(weights: &[f64], centre: isize, len: usize, sample: F) -> u8
    where
        F: Fn(usize) -> u8,
    {
        let radius = (weights.len() / 2) as isize;
        let mut acc = 0.0;
        for (tap, weight) in weights.iter().enumerate() {
            let index = reflect_index(centre + tap as isize - radius, len);
            acc += weight * sample(index) as f64;
        }
        // Truncate like an integer store, clamped to the byte range.
        acc.clamp(0.0, u8::MAX as f64) as u8
    }

    /// Maps any index onto `0..len` with half-sample symmetric reflection.
    pub fn reflect_index(index: isize, len: usize) -> usize {
        let period = 2 * len as isize;
        let folded = index.rem_euclid(period);
        if folded < len as isize {
            folded as usize
        } else {
            (period - 1 - folded) as usize
        }
    }
}

#[cfg(test)]
mod tests {
    use super::gaussian::*;
    use image::{GrayImage, Luma};

    #[test]
    fn kernel_is_normalised_and_symmetric() {
        let weights = kernel(DEFAULT_SIGMA);
        assert_eq!(weights.len(), 13);

        let total: f64 = weights.iter().sum();
        assert!((total - 1.0).abs() < 1e-12);
        for i in 0..weights.len() / 2 {
            assert!((weights[i] - weights[weights.len() - 1 - i]).abs() < 1e-15);
        }
        assert!(weights[6] > weights[5]);
    }

    #[test]
    fn reflect_index_mirrors_including_edge() {
        assert_eq!(reflect_index(-1, 5), 0);
        assert_eq!(reflect_index(-2, 5), 1);
        assert_eq!(reflect_index(5, 5), 4);
        assert_eq!(reflect_index(6, 5), 3);
        assert_eq!(reflect_index(2, 5), 2);
        // Radius larger than the image keeps folding.
        assert_eq!(reflect_index(-7, 3), 0);
        assert_eq!(reflect_index(9, 2), 1);
    }

    #[test]
    fn black_stays_black() {
        let image = GrayImage::new(16, 9);
        let smoothed = smooth(&image, DEFAULT_SIGMA);
        assert!(smoothed.pixels().all(|p| p.0[0] == 0));
    }

    #[test]
    fn zero_sigma_is_identity() {
        let mut image = GrayImage::new(4, 4);
        image.put_pixel(1, 2, Luma([200]));
        assert_eq!(smooth(&image, 0.0), image);
    }

    #[test]
    fn single_hot_pixel_is_spread_below_threshold() {
        let mut image = GrayImage::new(21, 21);
        image.put_pixel(10, 10, Luma([255]));
        let smoothed = smooth(&image, DEFAULT_SIGMA);

        let centre = smoothed.get_pixel(10, 10).0[0];
        assert!(centre < 100, "centre was {centre}");
        assert!(smoothed.get_pixel(11, 10).0[0] <= centre);
    }

    #[test]
    fn block_edges_soften() {
        let mut image = GrayImage::new(30, 30);
        for y in 10..20 {
            for x in 10..20 {
                image.put_pixel(x, y, Luma([255]));
            }
        }
        let smoothed = smooth(&image, DEFAULT_SIGMA);

        // Just inside the top edge, just outside it.
        assert!((160..=161).contains(&smoothed.get_pixel(15, 10).0[0]));
        assert!((92..=93).contains(&smoothed.get_pixel(15, 9).0[0]));
        // Inside corner keeps roughly 0.63^2 of the energy.
        assert_eq!(smoothed.get_pixel(10, 10).0[0], 101);
    }
}
