use image::Rgba;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha: u8,
}

impl Color {
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    pub const BLACK: Self = Self::new(0, 0, 0, 255);

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, alpha: u8) -> Self {
        Self { r, g, b, alpha }
    }

    #[must_use]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    #[must_use]
    pub const fn with_alpha(self, alpha: u8) -> Self {
        Self { alpha, ..self }
    }

    #[must_use]
    pub const fn is_transparent(&self) -> bool {
        self.alpha == 0
    }

    #[must_use]
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.alpha]
    }
}

impl From<[u8; 4]> for Color {
    fn from([r, g, b, alpha]: [u8; 4]) -> Self {
        Self { r, g, b, alpha }
    }
}

impl From<Color> for [u8; 4] {
    fn from(value: Color) -> Self {
        value.to_array()
    }
}

impl From<Rgba<u8>> for Color {
    fn from(value: Rgba<u8>) -> Self {
        value.0.into()
    }
}

impl From<Color> for Rgba<u8> {
    fn from(value: Color) -> Self {
        Rgba(value.to_array())
    }
}

/// Composites `src` over `dst` using straight (non-premultiplied) alpha.
#[must_use]
pub fn merge_colors(src: Color, dst: Color) -> Color {
    match (src.alpha, dst.alpha) {
        (0, 0) => return Color::TRANSPARENT,
        (0, _) => return dst,
        (_, 0) => return src,
        _ => {}
    }

    let src_alpha = f32::from(src.alpha) / 255.0;
    let dst_alpha = f32::from(dst.alpha) / 255.0;

    let out_alpha = 1.0 - (1.0 - src_alpha) * (1.0 - dst_alpha);

    let blend = |s: u8, d: u8| -> u8 {
        let value = (f32::from(s) * src_alpha + f32::from(d) * dst_alpha * (1.0 - src_alpha))
            / out_alpha;

        value.round().clamp(0.0, 255.0) as u8
    };

    Color {
        r: blend(src.r, dst.r),
        g: blend(src.g, dst.g),
        b: blend(src.b, dst.b),
        alpha: (out_alpha * 255.0).round().clamp(0.0, 255.0) as u8,
    }
}
