// THEORY (Pixel Heuristics):
// The `Pixel` module is the most fundamental unit of the image-to-geometry engine.
// It is a "dumb" data container for a single RGBA sample plus the handful of
// single-pixel heuristics the later stages need. Nothing here reads a neighbor;
// anything that compares pixels against a palette lives in the quantizer and the
// region finder.
//
// Heuristic families (all single-pixel):
// - Visibility:  alpha strictly above 128 counts as visible
// - Bucketing:   each channel floored to a multiple of 32 (coarse box quantization)
// - Brightness:  luminance (Rec. 601 weights on raw 0..255 channels)
// - Color strength: chroma (max - min across R, G, B)
//
// Bucketing is deliberately a floor, not a round: 255 lands in the 224 bucket, and
// two samples share a bucket exactly when their channels agree after `/ 32`.

pub mod pixel {
    pub type Channel = u8;
    pub type Luminance = f64;
    pub type Chroma = u8;

    /// Number of byte slots per RGBA sample.
    pub const CHANNELS: usize = 4;
    /// Width of one quantization bucket on every channel.
    pub const BUCKET_SIZE: Channel = 32;
    /// Samples with alpha at or below this value are ignored by the quantizer.
    pub const VISIBILITY_THRESHOLD: Channel = 128;

    /// A "dumb" data container representing a single RGBA pixel.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Pixel {
        /// The red channel value (0-255).
        pub red: Channel,
        /// The green channel value (0-255).
        pub green: Channel,
        /// The blue channel value (0-255).
        pub blue: Channel,
        /// The alpha (transparency) channel value (0-255).
        pub alpha: Channel,
    }

    impl Pixel {
        pub const fn new(red: Channel, green: Channel, blue: Channel, alpha: Channel) -> Self {
            Pixel {
                red,
                green,
                blue,
                alpha,
            }
        }

        /// A fully opaque pixel.
        pub const fn opaque(red: Channel, green: Channel, blue: Channel) -> Self {
            Self::new(red, green, blue, Channel::MAX)
        }

        /// =================================Heuristics==================================

        /// Luminance estimate (Rec. 601 luma) on the raw 0..255 channels.
        pub fn luminance(&self) -> Luminance {
            0.299_f64 * self.red as f64 + 0.587_f64 * self.green as f64 + 0.114_f64 * self.blue as f64
        }

        /// Chroma: the spread between the strongest and weakest color channel.
        pub fn chroma(&self) -> Chroma {
            let max = self.red.max(self.green).max(self.blue);
            let min = self.red.min(self.green).min(self.blue);
            max - min
        }

        pub fn is_visible(&self) -> bool {
            self.alpha > VISIBILITY_THRESHOLD
        }

        /// The pixel's RGB channels after box quantization. Alpha is dropped.
        pub fn bucketed(&self) -> [Channel; 3] {
            [bucket(self.red), bucket(self.green), bucket(self.blue)]
        }
    }

    /// Floors a channel to the nearest lower multiple of `BUCKET_SIZE`.
    #[inline]
    pub fn bucket(value: Channel) -> Channel {
        (value / BUCKET_SIZE) * BUCKET_SIZE
    }

    impl From<&[u8]> for Pixel {
        /// Reads up to four bytes as R, G, B, A. Missing color bytes read as 0 and a
        /// missing alpha byte reads as fully opaque.
        fn from(bytes: &[u8]) -> Self {
            Pixel {
                red: bytes.first().copied().unwrap_or(0),
                green: bytes.get(1).copied().unwrap_or(0),
                blue: bytes.get(2).copied().unwrap_or(0),
                alpha: bytes.get(3).copied().unwrap_or(Channel::MAX),
            }
        }
    }

    impl From<image::Rgba<u8>> for Pixel {
        fn from(rgba: image::Rgba<u8>) -> Self {
            let [red, green, blue, alpha] = rgba.0;
            Pixel::new(red, green, blue, alpha)
        }
    }

    impl From<Pixel> for image::Rgba<u8> {
        fn from(pixel: Pixel) -> Self {
            image::Rgba([pixel.red, pixel.green, pixel.blue, pixel.alpha])
        }
    }
}
