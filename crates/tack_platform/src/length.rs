//! CSS-style lengths and calc() composition
//!
//! Box metrics come back from the host as [`Length`] values that may carry
//! different units. Sentinel geometry sums them, so the result is a
//! [`CalcLength`]: a normalized sum of per-unit coefficients that renders as
//! either a plain length (`120px`) or a `calc(...)` expression and resolves
//! to pixels against a [`LengthContext`].
//!
//! # Example
//!
//! ```rust
//! use tack_platform::{CalcLength, Length, LengthContext};
//!
//! let margin: Length = "1em".parse().unwrap();
//! let height: Length = "100px".parse().unwrap();
//!
//! let extent = CalcLength::from(margin) + CalcLength::from(height);
//! assert_eq!(extent.to_string(), "calc(100px + 1em)");
//! assert_eq!(extent.resolve(&LengthContext::default()), 116.0);
//! ```

use std::fmt;
use std::ops::{Add, Neg, Sub};
use std::str::FromStr;

use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case},
    character::complete::{char, digit0, digit1, multispace0, one_of},
    combinator::{all_consuming, map_res, opt, recognize},
    sequence::{delimited, pair, tuple},
    IResult,
};

use crate::error::PlatformError;

/// A single length with a unit
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Length {
    /// Pixels
    Px(f32),
    /// Multiples of the element's font size
    Em(f32),
    /// Multiples of the root font size
    Rem(f32),
    /// Percentage of the context's percentage basis
    Pct(f32),
}

impl Length {
    pub const ZERO: Length = Length::Px(0.0);

    /// Resolve to pixels
    pub fn to_px(&self, cx: &LengthContext) -> f32 {
        match *self {
            Length::Px(v) => v,
            Length::Em(v) => v * cx.font_size,
            Length::Rem(v) => v * cx.root_font_size,
            Length::Pct(v) => v / 100.0 * cx.percent_basis,
        }
    }
}

impl Default for Length {
    fn default() -> Self {
        Length::ZERO
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Length::Px(v) => write!(f, "{}px", v),
            Length::Em(v) => write!(f, "{}em", v),
            Length::Rem(v) => write!(f, "{}rem", v),
            Length::Pct(v) => write!(f, "{}%", v),
        }
    }
}

impl FromStr for Length {
    type Err = PlatformError;

    /// Parse `16px`, `1.5em`, `2rem`, `10%`, or a unitless number (pixels)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        all_consuming(delimited(multispace0, parse_length, multispace0))(s)
            .map(|(_, len)| len)
            .map_err(|_| PlatformError::InvalidLength(s.to_string()))
    }
}

/// Signed decimal number without exponent
///
/// Exponents are rejected so that `2em` is read as two em, not as a
/// malformed `2e` exponent.
fn parse_number(input: &str) -> IResult<&str, f32> {
    map_res(
        recognize(tuple((
            opt(one_of("+-")),
            alt((
                recognize(pair(digit1, opt(pair(char('.'), digit0)))),
                recognize(pair(char('.'), digit1)),
            )),
        ))),
        str::parse::<f32>,
    )(input)
}

fn parse_length(input: &str) -> IResult<&str, Length> {
    let (input, value) = parse_number(input)?;
    let (input, unit) = opt(alt((
        tag_no_case("px"),
        tag_no_case("rem"),
        tag_no_case("em"),
        tag("%"),
    )))(input)?;

    let length = match unit.map(str::to_ascii_lowercase).as_deref() {
        Some("em") => Length::Em(value),
        Some("rem") => Length::Rem(value),
        Some("%") => Length::Pct(value),
        _ => Length::Px(value),
    };

    Ok((input, length))
}

/// Values needed to turn relative units into pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LengthContext {
    /// Font size of the measured element, in pixels
    pub font_size: f32,
    /// Font size of the document root, in pixels
    pub root_font_size: f32,
    /// Pixel length that `100%` refers to
    pub percent_basis: f32,
}

impl Default for LengthContext {
    fn default() -> Self {
        Self {
            font_size: 16.0,
            root_font_size: 16.0,
            percent_basis: 0.0,
        }
    }
}

impl LengthContext {
    /// Set the element font size
    pub fn font_size(mut self, font_size: f32) -> Self {
        self.font_size = font_size;
        self
    }

    /// Set the root font size
    pub fn root_font_size(mut self, root_font_size: f32) -> Self {
        self.root_font_size = root_font_size;
        self
    }

    /// Set what `100%` resolves to
    pub fn percent_basis(mut self, percent_basis: f32) -> Self {
        self.percent_basis = percent_basis;
        self
    }
}

/// A sum of lengths in mixed units, equivalent to a CSS `calc()` sum
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CalcLength {
    pub px: f32,
    pub em: f32,
    pub rem: f32,
    pub pct: f32,
}

impl CalcLength {
    pub const ZERO: CalcLength = CalcLength {
        px: 0.0,
        em: 0.0,
        rem: 0.0,
        pct: 0.0,
    };

    /// Resolve to pixels
    pub fn resolve(&self, cx: &LengthContext) -> f32 {
        self.px
            + Length::Em(self.em).to_px(cx)
            + Length::Rem(self.rem).to_px(cx)
            + Length::Pct(self.pct).to_px(cx)
    }

    /// Non-zero terms in a stable unit order
    fn terms(&self) -> impl Iterator<Item = Length> {
        [
            Length::Px(self.px),
            Length::Em(self.em),
            Length::Rem(self.rem),
            Length::Pct(self.pct),
        ]
        .into_iter()
        .filter(|len| match *len {
            Length::Px(v) | Length::Em(v) | Length::Rem(v) | Length::Pct(v) => v != 0.0,
        })
    }

    /// True when the sum uses a single unit (or is zero)
    pub fn is_simple(&self) -> bool {
        self.terms().count() <= 1
    }
}

impl From<Length> for CalcLength {
    fn from(len: Length) -> Self {
        let mut calc = CalcLength::ZERO;
        match len {
            Length::Px(v) => calc.px = v,
            Length::Em(v) => calc.em = v,
            Length::Rem(v) => calc.rem = v,
            Length::Pct(v) => calc.pct = v,
        }
        calc
    }
}

impl Add for CalcLength {
    type Output = CalcLength;

    fn add(self, rhs: CalcLength) -> CalcLength {
        CalcLength {
            px: self.px + rhs.px,
            em: self.em + rhs.em,
            rem: self.rem + rhs.rem,
            pct: self.pct + rhs.pct,
        }
    }
}

impl Add<Length> for CalcLength {
    type Output = CalcLength;

    fn add(self, rhs: Length) -> CalcLength {
        self + CalcLength::from(rhs)
    }
}

impl Neg for CalcLength {
    type Output = CalcLength;

    fn neg(self) -> CalcLength {
        CalcLength {
            px: -self.px,
            em: -self.em,
            rem: -self.rem,
            pct: -self.pct,
        }
    }
}

impl Sub for CalcLength {
    type Output = CalcLength;

    fn sub(self, rhs: CalcLength) -> CalcLength {
        self + (-rhs)
    }
}

impl fmt::Display for CalcLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let terms: Vec<Length> = self.terms().collect();
        match terms.as_slice() {
            [] => write!(f, "0px"),
            [single] => write!(f, "{}", single),
            [first, rest @ ..] => {
                write!(f, "calc({}", first)?;
                for term in rest {
                    let (negative, magnitude) = match *term {
                        Length::Px(v) => (v < 0.0, Length::Px(v.abs())),
                        Length::Em(v) => (v < 0.0, Length::Em(v.abs())),
                        Length::Rem(v) => (v < 0.0, Length::Rem(v.abs())),
                        Length::Pct(v) => (v < 0.0, Length::Pct(v.abs())),
                    };
                    write!(f, " {} {}", if negative { '-' } else { '+' }, magnitude)?;
                }
                write!(f, ")")
            }
        }
    }
}
