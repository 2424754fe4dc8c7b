// src/render/palette.rs

/// Colour ramps for bar fills, sampled evenly across the bars of a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    Viridis,
    Magma,
    CoolWarm,
    Blues,
}

type Rgb = (u8, u8, u8);

const VIRIDIS: &[Rgb] = &[
    (0x44, 0x01, 0x54),
    (0x3b, 0x52, 0x8b),
    (0x21, 0x91, 0x8c),
    (0x5e, 0xc9, 0x62),
    (0xfd, 0xe7, 0x25),
];
const MAGMA: &[Rgb] = &[
    (0x1c, 0x10, 0x44),
    (0x4f, 0x12, 0x7b),
    (0x81, 0x25, 0x81),
    (0xb5, 0x36, 0x7a),
    (0xe5, 0x50, 0x64),
    (0xfb, 0x87, 0x61),
    (0xfe, 0xc2, 0x87),
];
const COOLWARM: &[Rgb] = &[(0x3b, 0x4c, 0xc0), (0xdd, 0xdd, 0xdd), (0xb4, 0x04, 0x26)];
const BLUES: &[Rgb] = &[
    (0xde, 0xeb, 0xf7),
    (0x9e, 0xca, 0xe1),
    (0x42, 0x92, 0xc6),
    (0x08, 0x51, 0x9c),
];

impl Palette {
    fn stops(self) -> &'static [Rgb] {
        match self {
            Palette::Viridis => VIRIDIS,
            Palette::Magma => MAGMA,
            Palette::CoolWarm => COOLWARM,
            Palette::Blues => BLUES,
        }
    }

    /// Colour at position `t` in `[0, 1]`, linearly interpolated between stops.
    pub fn at(self, t: f64) -> Rgb {
        let stops = self.stops();
        let t = t.clamp(0.0, 1.0);
        let scaled = t * (stops.len() - 1) as f64;
        let lo = scaled.floor() as usize;
        let hi = (lo + 1).min(stops.len() - 1);
        let frac = scaled - lo as f64;
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
        let (a, b) = (stops[lo], stops[hi]);
        (mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
    }

    /// `n` evenly spaced colours as `#rrggbb`.
    pub fn sample(self, n: usize) -> Vec<String> {
        (0..n)
            .map(|i| {
                let t = if n <= 1 { 0.5 } else { i as f64 / (n - 1) as f64 };
                let (r, g, b) = self.at(t);
                format!("#{:02x}{:02x}{:02x}", r, g, b)
            })
            .collect()
    }
}
