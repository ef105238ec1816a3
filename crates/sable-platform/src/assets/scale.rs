use std::fmt;

/// Ratio of physical pixels to logical units, for a display or an asset variant.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct Scale {
    factor: f32,
}

/// A scale-variant candidate: the path to try and the scale its pixels are at.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledResource {
    pub scale: Scale,
    pub path: String,
}

impl Scale {
    pub const ONE: Scale = Scale { factor: 1.0 };

    /// Non-finite or non-positive factors fall back to 1.
    pub fn new(factor: f32) -> Self {
        if factor.is_finite() && factor > 0.0 {
            Self { factor }
        } else {
            log::warn!("ignoring invalid scale factor {factor}, using 1");
            Self::ONE
        }
    }

    #[inline]
    pub fn factor(self) -> f32 {
        self.factor
    }

    /// Physical → logical.
    #[inline]
    pub fn inv_scaled(self, length: f32) -> f32 {
        length / self.factor
    }

    /// Candidate resources for `path`, highest resolution first, base path last.
    ///
    /// The candidate scales are this factor (when above 1) and every whole
    /// factor from `ceil(factor)` down to 2, so a 1.5 display also looks for
    /// `@2x` art to shrink rather than settling for `@1x` art to stretch.
    pub fn scaled_resources(self, path: &str) -> Vec<ScaledResource> {
        let mut scales: Vec<f32> = Vec::new();
        if self.factor > 1.0 {
            scales.push(self.factor);
        }
        let mut whole = self.factor.ceil();
        while whole > 1.0 {
            if whole != self.factor {
                scales.push(whole);
            }
            whole -= 1.0;
        }
        scales.sort_by(|a, b| b.total_cmp(a));
        scales.dedup();

        let mut out: Vec<ScaledResource> = scales
            .into_iter()
            .map(|f| ScaledResource { scale: Scale { factor: f }, path: variant_path(path, f) })
            .collect();
        out.push(ScaledResource { scale: Scale::ONE, path: path.to_string() });
        out
    }
}

impl Default for Scale {
    fn default() -> Self {
        Scale::ONE
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x", self.factor)
    }
}

/// Inserts `@{factor}x` before the extension of the last path segment.
fn variant_path(path: &str, factor: f32) -> String {
    let suffix = format!("@{factor}x");
    let name_start = path.rfind('/').map_or(0, |i| i + 1);
    match path[name_start..].rfind('.') {
        Some(dot) => {
            let dot = name_start + dot;
            format!("{}{}{}", &path[..dot], suffix, &path[dot..])
        }
        None => format!("{path}{suffix}"),
    }
}
