//! Named easing curves
//!
//! Each curve maps normalized time t in [0, 1] to a progress factor.
//! Curves may overshoot outside [0, 1] (back, elastic); consumers clamp
//! where the property demands it (opacity). An unrecognized curve name
//! falls back to linear with a logged warning, never an error.

use std::f64::consts::PI;

/// A named easing curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Easing {
    Linear,
    Ease,
    EaseIn,
    EaseOut,
    EaseInOut,
    SineIn,
    SineOut,
    SineInOut,
    QuadIn,
    QuadOut,
    QuadInOut,
    CubicIn,
    CubicOut,
    CubicInOut,
    QuartIn,
    QuartOut,
    QuartInOut,
    QuintIn,
    QuintOut,
    QuintInOut,
    ExpoIn,
    ExpoOut,
    ExpoInOut,
    CircIn,
    CircOut,
    CircInOut,
    BackIn,
    BackOut,
    BackInOut,
    ElasticIn,
    ElasticOut,
    ElasticInOut,
    BounceIn,
    BounceOut,
    BounceInOut,
}

impl Easing {
    /// Look up a curve by its wire name
    pub fn parse(name: &str) -> Option<Self> {
        let curve = match name {
            "linear" => Self::Linear,
            "ease" => Self::Ease,
            "ease-in" | "easeIn" => Self::EaseIn,
            "ease-out" | "easeOut" => Self::EaseOut,
            "ease-in-out" | "easeInOut" => Self::EaseInOut,
            "sine-in" | "easeInSine" => Self::SineIn,
            "sine-out" | "easeOutSine" => Self::SineOut,
            "sine-in-out" | "easeInOutSine" => Self::SineInOut,
            "quad-in" | "easeInQuad" => Self::QuadIn,
            "quad-out" | "easeOutQuad" => Self::QuadOut,
            "quad-in-out" | "easeInOutQuad" => Self::QuadInOut,
            "cubic-in" | "easeInCubic" => Self::CubicIn,
            "cubic-out" | "easeOutCubic" => Self::CubicOut,
            "cubic-in-out" | "easeInOutCubic" => Self::CubicInOut,
            "quart-in" | "easeInQuart" => Self::QuartIn,
            "quart-out" | "easeOutQuart" => Self::QuartOut,
            "quart-in-out" | "easeInOutQuart" => Self::QuartInOut,
            "quint-in" | "easeInQuint" => Self::QuintIn,
            "quint-out" | "easeOutQuint" => Self::QuintOut,
            "quint-in-out" | "easeInOutQuint" => Self::QuintInOut,
            "expo-in" | "easeInExpo" => Self::ExpoIn,
            "expo-out" | "easeOutExpo" => Self::ExpoOut,
            "expo-in-out" | "easeInOutExpo" => Self::ExpoInOut,
            "circ-in" | "easeInCirc" => Self::CircIn,
            "circ-out" | "easeOutCirc" => Self::CircOut,
            "circ-in-out" | "easeInOutCirc" => Self::CircInOut,
            "back-in" | "easeInBack" => Self::BackIn,
            "back-out" | "easeOutBack" => Self::BackOut,
            "back-in-out" | "easeInOutBack" => Self::BackInOut,
            "elastic-in" | "easeInElastic" => Self::ElasticIn,
            "elastic-out" | "easeOutElastic" => Self::ElasticOut,
            "elastic-in-out" | "easeInOutElastic" => Self::ElasticInOut,
            "bounce-in" | "easeInBounce" => Self::BounceIn,
            "bounce-out" | "easeOutBounce" => Self::BounceOut,
            "bounce-in-out" | "easeInOutBounce" => Self::BounceInOut,
            _ => return None,
        };
        Some(curve)
    }

    /// Look up a curve, falling back to linear for unknown names
    pub fn parse_or_linear(name: &str) -> Self {
        Self::parse(name).unwrap_or_else(|| {
            log::warn!("Unknown easing curve '{}', falling back to linear", name);
            Self::Linear
        })
    }

    /// Evaluate the curve at normalized time t in [0, 1]
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            // The CSS `ease` family, approximated by the usual cubics
            Self::Ease => Self::CubicInOut.apply(t),
            Self::EaseIn => Self::CubicIn.apply(t),
            Self::EaseOut => Self::CubicOut.apply(t),
            Self::EaseInOut => Self::CubicInOut.apply(t),

            Self::SineIn => 1.0 - (t * PI / 2.0).cos(),
            Self::SineOut => (t * PI / 2.0).sin(),
            Self::SineInOut => -(((PI * t).cos()) - 1.0) / 2.0,

            Self::QuadIn => t * t,
            Self::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Self::QuadInOut => in_out(t, |x| x * x),

            Self::CubicIn => t.powi(3),
            Self::CubicOut => 1.0 - (1.0 - t).powi(3),
            Self::CubicInOut => in_out(t, |x| x.powi(3)),

            Self::QuartIn => t.powi(4),
            Self::QuartOut => 1.0 - (1.0 - t).powi(4),
            Self::QuartInOut => in_out(t, |x| x.powi(4)),

            Self::QuintIn => t.powi(5),
            Self::QuintOut => 1.0 - (1.0 - t).powi(5),
            Self::QuintInOut => in_out(t, |x| x.powi(5)),

            Self::ExpoIn => {
                if t == 0.0 {
                    0.0
                } else {
                    (2.0_f64).powf(10.0 * t - 10.0)
                }
            }
            Self::ExpoOut => {
                if t == 1.0 {
                    1.0
                } else {
                    1.0 - (2.0_f64).powf(-10.0 * t)
                }
            }
            Self::ExpoInOut => in_out(t, |x| Self::ExpoIn.apply(x)),

            Self::CircIn => 1.0 - (1.0 - t * t).sqrt(),
            Self::CircOut => (1.0 - (t - 1.0) * (t - 1.0)).sqrt(),
            Self::CircInOut => in_out(t, |x| Self::CircIn.apply(x)),

            Self::BackIn => {
                const C1: f64 = 1.70158;
                (C1 + 1.0) * t.powi(3) - C1 * t * t
            }
            Self::BackOut => {
                const C1: f64 = 1.70158;
                let u = t - 1.0;
                1.0 + (C1 + 1.0) * u.powi(3) + C1 * u * u
            }
            Self::BackInOut => in_out(t, |x| Self::BackIn.apply(x)),

            Self::ElasticIn => {
                const C4: f64 = 2.0 * PI / 3.0;
                if t == 0.0 || t == 1.0 {
                    t
                } else {
                    -(2.0_f64).powf(10.0 * t - 10.0) * ((t * 10.0 - 10.75) * C4).sin()
                }
            }
            Self::ElasticOut => {
                const C4: f64 = 2.0 * PI / 3.0;
                if t == 0.0 || t == 1.0 {
                    t
                } else {
                    (2.0_f64).powf(-10.0 * t) * ((t * 10.0 - 0.75) * C4).sin() + 1.0
                }
            }
            Self::ElasticInOut => in_out(t, |x| Self::ElasticIn.apply(x)),

            Self::BounceIn => 1.0 - bounce_out(1.0 - t),
            Self::BounceOut => bounce_out(t),
            Self::BounceInOut => {
                if t < 0.5 {
                    (1.0 - bounce_out(1.0 - 2.0 * t)) / 2.0
                } else {
                    (1.0 + bounce_out(2.0 * t - 1.0)) / 2.0
                }
            }
        }
    }
}

/// Build an in-out curve from its in form by mirroring around 0.5
fn in_out(t: f64, ease_in: impl Fn(f64) -> f64) -> f64 {
    if t < 0.5 {
        ease_in(2.0 * t) / 2.0
    } else {
        1.0 - ease_in(2.0 * (1.0 - t)) / 2.0
    }
}

fn bounce_out(t: f64) -> f64 {
    const N1: f64 = 7.5625;
    const D1: f64 = 2.75;

    if t < 1.0 / D1 {
        N1 * t * t
    } else if t < 2.0 / D1 {
        let u = t - 1.5 / D1;
        N1 * u * u + 0.75
    } else if t < 2.5 / D1 {
        let u = t - 2.25 / D1;
        N1 * u * u + 0.9375
    } else {
        let u = t - 2.625 / D1;
        N1 * u * u + 0.984375
    }
}
