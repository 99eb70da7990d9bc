//! Named token transforms and transform groups.
//!
//! Transforms form a closed set resolved from their names when the
//! configuration is loaded, so an unknown name fails before any build starts.
pub mod color;
pub mod name;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::TokenError;
use crate::tokens::{Token, TokenValue, parse_number, reference};

use self::color::Color;

/// Categories whose bare numbers are pixel sizes.
pub const SIZE_CATEGORIES: &[&str] = &[
    "size",
    "spacing",
    "borderWidth",
    "radii",
    "fontSize",
    "lineHeight",
];

/// A pixel size such as `4px` or `1.5px`.
#[allow(clippy::expect_used)]
static PX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9.]+)px$").expect("px pattern is valid"));

/// What part of a token a transform rewrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Derives attributes.
    Attribute,
    /// Rewrites the output name.
    Name,
    /// Rewrites the value.
    Value,
}

/// A built-in transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transform {
    /// `attribute/cti`
    AttributeCti,
    /// `name/cti/kebab`
    NameKebab,
    /// `name/cti/camel`
    NameCamel,
    /// `name/cti/constant`
    NameConstant,
    /// `name/cti/snake`
    NameSnake,
    /// `size/px`
    SizePx,
    /// `size/pxToPt`
    SizePxToPt,
    /// `size/pxToDp`
    SizePxToDp,
    /// `size/pxToDouble`
    SizePxToDouble,
    /// `angle/degrees`
    AngleDegrees,
    /// `time/seconds`
    TimeSeconds,
    /// `color/hex`
    ColorHex,
    /// `color/css`
    ColorCss,
    /// `color/hex8flutter`
    ColorHex8Flutter,
}

impl Transform {
    /// Every built-in transform.
    pub const ALL: &[Self] = &[
        Self::AttributeCti,
        Self::NameKebab,
        Self::NameCamel,
        Self::NameConstant,
        Self::NameSnake,
        Self::SizePx,
        Self::SizePxToPt,
        Self::SizePxToDp,
        Self::SizePxToDouble,
        Self::AngleDegrees,
        Self::TimeSeconds,
        Self::ColorHex,
        Self::ColorCss,
        Self::ColorHex8Flutter,
    ];

    /// Registered name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::AttributeCti => "attribute/cti",
            Self::NameKebab => "name/cti/kebab",
            Self::NameCamel => "name/cti/camel",
            Self::NameConstant => "name/cti/constant",
            Self::NameSnake => "name/cti/snake",
            Self::SizePx => "size/px",
            Self::SizePxToPt => "size/pxToPt",
            Self::SizePxToDp => "size/pxToDp",
            Self::SizePxToDouble => "size/pxToDouble",
            Self::AngleDegrees => "angle/degrees",
            Self::TimeSeconds => "time/seconds",
            Self::ColorHex => "color/hex",
            Self::ColorCss => "color/css",
            Self::ColorHex8Flutter => "color/hex8flutter",
        }
    }

    /// Which part of the token this transform rewrites.
    #[must_use]
    pub const fn kind(self) -> Kind {
        match self {
            Self::AttributeCti => Kind::Attribute,
            Self::NameKebab | Self::NameCamel | Self::NameConstant | Self::NameSnake => Kind::Name,
            _ => Kind::Value,
        }
    }

    /// Whether this transform applies to `token`.
    #[must_use]
    pub fn matches(self, token: &Token) -> bool {
        match self {
            Self::AttributeCti
            | Self::NameKebab
            | Self::NameCamel
            | Self::NameConstant
            | Self::NameSnake => true,
            Self::SizePx => {
                SIZE_CATEGORIES.contains(&token.category.as_str()) && token.value.is_numeric()
            }
            Self::SizePxToPt | Self::SizePxToDp => px_amount(&token.value).is_some(),
            Self::SizePxToDouble => px_amount(&token.value).and_then(parse_number).is_some(),
            Self::AngleDegrees => token.category == "angle" && token.value.is_numeric(),
            Self::TimeSeconds => token.category == "time" && token.value.is_numeric(),
            Self::ColorHex | Self::ColorCss | Self::ColorHex8Flutter => {
                token.category == "color" && color_of(token).is_some()
            }
        }
    }

    /// Apply this transform to a matching token, returning the new token.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Transform`] if a value transform would introduce
    /// alias reference syntax.
    pub fn apply(self, token: &Token, ctx: &TransformContext<'_>) -> Result<Token, TokenError> {
        let mut out = token.clone();
        match self.kind() {
            Kind::Attribute => {
                out.attributes.extend(cti_attributes(&token.path));
            }
            Kind::Name => {
                let parts: Vec<&str> = ctx
                    .prefix
                    .into_iter()
                    .chain(token.path.iter().map(String::as_str))
                    .collect();
                out.name = match self {
                    Self::NameCamel => name::camel(&parts),
                    Self::NameConstant => name::constant(&parts),
                    Self::NameSnake => name::snake(&parts),
                    _ => name::kebab(&parts),
                };
            }
            Kind::Value => {
                out.value = self.checked_value(token, self.transform_value(token))?;
            }
        }
        Ok(out)
    }

    /// Accept `produced` as the new value of `token` unless it contains alias
    /// syntax the old value did not.
    fn checked_value(self, token: &Token, produced: String) -> Result<TokenValue, TokenError> {
        let had_reference = matches!(&token.value, TokenValue::Text(s) if reference::contains(s));
        if !had_reference && reference::contains(&produced) {
            return Err(TokenError::Transform {
                transform: self.name().to_string(),
                token: token.dotted_path(),
                message: format!("produced an alias reference: {produced}"),
            });
        }
        Ok(TokenValue::Text(produced))
    }

    fn transform_value(self, token: &Token) -> String {
        let value = &token.value;
        match self {
            Self::SizePx => format!("{value}px"),
            Self::SizePxToPt => swap_unit(value, "pt"),
            Self::SizePxToDp => swap_unit(value, "dp"),
            Self::SizePxToDouble => {
                let amount = px_amount(value).unwrap_or_default();
                if amount.contains('.') {
                    amount.to_string()
                } else {
                    format!("{amount}.0")
                }
            }
            Self::AngleDegrees => format!("{value}deg"),
            Self::TimeSeconds => {
                format!("{:.2}s", value.as_f64().unwrap_or_default() / 1000.0)
            }
            Self::ColorHex => color_of(token).map_or_else(|| value.to_string(), Color::to_hex),
            Self::ColorCss => color_of(token).map_or_else(|| value.to_string(), Color::to_css),
            Self::ColorHex8Flutter => {
                color_of(token).map_or_else(|| value.to_string(), Color::to_flutter)
            }
            _ => value.to_string(),
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Transform {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.name() == s)
            .ok_or_else(|| TokenError::UnknownTransform(s.to_string()))
    }
}

/// Read-only context shared by every transform of one target.
#[derive(Debug, Clone, Copy)]
pub struct TransformContext<'a> {
    /// Name prefix of the target (e.g. `token`).
    pub prefix: Option<&'a str>,
    /// The full token set as seen before the current transform.
    pub tokens: &'a [Token],
}

/// Apply `transforms` in order. Each transform sees the output of the
/// previous one; unmatched tokens pass through unchanged.
///
/// # Errors
///
/// Returns the first transform error encountered.
pub fn apply_all(
    transforms: &[Transform],
    mut tokens: Vec<Token>,
    prefix: Option<&str>,
) -> Result<Vec<Token>, TokenError> {
    for &transform in transforms {
        let ctx = TransformContext {
            prefix,
            tokens: &tokens,
        };
        let next = tokens
            .iter()
            .map(|t| {
                if transform.matches(t) {
                    transform.apply(t, &ctx)
                } else {
                    Ok(t.clone())
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        tokens = next;
    }
    Ok(tokens)
}

fn cti_attributes(path: &[String]) -> impl Iterator<Item = (String, String)> + '_ {
    ["category", "type", "item", "subitem", "state"]
        .iter()
        .zip(path)
        .map(|(key, segment)| ((*key).to_string(), segment.clone()))
}

/// The amount of a `<digits and dots>px` value.
fn px_amount(value: &TokenValue) -> Option<&str> {
    let TokenValue::Text(s) = value else {
        return None;
    };
    Some(PX.captures(s)?.get(1)?.as_str())
}

fn swap_unit(value: &TokenValue, unit: &str) -> String {
    px_amount(value).map_or_else(|| value.to_string(), |amount| format!("{amount}{unit}"))
}

fn color_of(token: &Token) -> Option<Color> {
    match &token.value {
        TokenValue::Text(s) => Color::parse(s),
        TokenValue::Number(_) => None,
    }
}

/// Named, ordered transform lists.
///
/// Built once from the built-in groups plus any groups declared in
/// configuration, then shared read-only by every build.
#[derive(Debug, Clone)]
pub struct Registry {
    groups: BTreeMap<String, Vec<Transform>>,
}

impl Registry {
    /// The built-in transform groups.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::UnknownTransform`] if a built-in group lists a
    /// name that is not registered.
    pub fn builtin() -> Result<Self, TokenError> {
        let mut registry = Self {
            groups: BTreeMap::new(),
        };
        for &(name, transforms) in BUILTIN_GROUPS {
            registry.register(name, transforms)?;
        }
        Ok(registry)
    }

    /// Register (or replace) a group from transform names.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::UnknownTransform`] for any unknown name.
    pub fn register<S: AsRef<str>>(
        &mut self,
        name: &str,
        transforms: &[S],
    ) -> Result<(), TokenError> {
        let parsed = transforms
            .iter()
            .map(|t| t.as_ref().parse())
            .collect::<Result<Vec<Transform>, _>>()?;
        self.groups.insert(name.to_string(), parsed);
        Ok(())
    }

    /// Look up a group by name.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::UnknownTransformGroup`] if no group has that name.
    pub fn group(&self, name: &str) -> Result<&[Transform], TokenError> {
        self.groups
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| TokenError::UnknownTransformGroup(name.to_string()))
    }

    /// Registered group names, sorted.
    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }
}

const BUILTIN_GROUPS: &[(&str, &[&str])] = &[
    (
        "styleguide",
        &["attribute/cti", "name/cti/kebab", "size/px", "color/css"],
    ),
    ("tokens-js", &["name/cti/constant", "size/px", "color/hex"]),
    (
        "tokens-json",
        &["attribute/cti", "name/cti/kebab", "size/px", "color/css"],
    ),
    (
        "tokens-scss",
        &["name/cti/kebab", "time/seconds", "size/px", "color/css"],
    ),
    (
        "tokens-ios",
        &["attribute/cti", "name/cti/camel", "size/pxToPt"],
    ),
    (
        "tokens-android",
        &["attribute/cti", "name/cti/camel", "size/pxToDp"],
    ),
    (
        "tokens-flutter",
        &[
            "attribute/cti",
            "name/cti/camel",
            "size/pxToDouble",
            "color/hex8flutter",
        ],
    ),
];

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::tokens::TokenDef;
    use std::path::PathBuf;

    fn token(path: &str, value: TokenValue) -> Token {
        let def = TokenDef {
            value,
            properties: serde_json::Map::new(),
            source: PathBuf::from("test.json"),
        };
        Token::from_def(path.split('.').map(String::from).collect(), &def)
    }

    fn text(path: &str, value: &str) -> Token {
        token(path, TokenValue::from(value))
    }

    fn run(transforms: &[Transform], t: Token, prefix: Option<&str>) -> Token {
        apply_all(transforms, vec![t], prefix).unwrap().remove(0)
    }

    #[test]
    fn every_transform_round_trips_through_its_name() {
        for &t in Transform::ALL {
            assert_eq!(t.name().parse::<Transform>().unwrap(), t);
        }
    }

    #[test]
    fn unknown_transform_name_fails() {
        let err = "size/em".parse::<Transform>().unwrap_err();
        assert!(matches!(err, TokenError::UnknownTransform(n) if n == "size/em"));
    }

    #[test]
    fn px_to_pt_and_dp() {
        let t = text("spacing.small", "4px");
        assert_eq!(run(&[Transform::SizePxToPt], t.clone(), None).value, TokenValue::from("4pt"));
        assert_eq!(run(&[Transform::SizePxToDp], t, None).value, TokenValue::from("4dp"));
    }

    #[test]
    fn px_conversions_leave_unitless_values_alone() {
        let t = text("spacing.small", "4");
        assert!(!Transform::SizePxToPt.matches(&t));
        assert!(!Transform::SizePxToDp.matches(&t));
        assert_eq!(run(&[Transform::SizePxToPt], t.clone(), None), t);
    }

    #[test]
    fn px_matcher_needs_digits_and_dots_only() {
        assert_eq!(px_amount(&TokenValue::from("12.5px")), Some("12.5"));
        assert_eq!(px_amount(&TokenValue::from("px")), None);
        assert_eq!(px_amount(&TokenValue::from("-4px")), None);
        assert_eq!(px_amount(&TokenValue::from("4px solid")), None);
        assert_eq!(px_amount(&TokenValue::from("\u{0664}px")), None);
        assert_eq!(px_amount(&TokenValue::Number(4.into())), None);
    }

    #[test]
    fn px_to_double_adds_decimal_point() {
        assert_eq!(
            run(&[Transform::SizePxToDouble], text("radii.small", "4px"), None).value,
            TokenValue::from("4.0")
        );
        assert_eq!(
            run(&[Transform::SizePxToDouble], text("radii.small", "1.5px"), None).value,
            TokenValue::from("1.5")
        );
    }

    #[test]
    fn size_px_appends_unit_to_bare_numbers_in_size_categories() {
        let t = token("spacing.medium", TokenValue::Number(8.into()));
        assert_eq!(run(&[Transform::SizePx], t, None).value, TokenValue::from("8px"));

        let opacity = token("opacity.half", TokenValue::Number(1.into()));
        assert!(!Transform::SizePx.matches(&opacity));
    }

    #[test]
    fn infinity_spellings_are_not_sizes() {
        let t = text("spacing.huge", "inf");
        assert!(!Transform::SizePx.matches(&t));
        assert_eq!(run(&[Transform::SizePx], t.clone(), None), t);
    }

    #[test]
    fn time_seconds_converts_milliseconds() {
        let t = token("time.fast", TokenValue::Number(250.into()));
        assert_eq!(run(&[Transform::TimeSeconds], t, None).value, TokenValue::from("0.25s"));
    }

    #[test]
    fn angle_degrees_appends_unit() {
        let t = token("angle.tilt", TokenValue::Number(45.into()));
        assert_eq!(run(&[Transform::AngleDegrees], t, None).value, TokenValue::from("45deg"));
    }

    #[test]
    fn color_transforms_only_touch_parseable_colors() {
        let c = text("color.brand", "#369");
        assert_eq!(run(&[Transform::ColorHex], c.clone(), None).value, TokenValue::from("#336699"));
        assert_eq!(
            run(&[Transform::ColorHex8Flutter], c, None).value,
            TokenValue::from("Color(0xFF336699)")
        );

        let gradient = text("color.hero", "linear-gradient(#fff, #000)");
        assert!(!Transform::ColorCss.matches(&gradient));

        let not_color = text("spacing.brand", "#336699");
        assert!(!Transform::ColorCss.matches(&not_color));
    }

    #[test]
    fn attribute_cti_derives_from_path() {
        let t = run(&[Transform::AttributeCti], text("color.background.primary", "#fff"), None);
        assert_eq!(t.attributes["category"], "color");
        assert_eq!(t.attributes["type"], "background");
        assert_eq!(t.attributes["item"], "primary");
        assert!(!t.attributes.contains_key("subitem"));
    }

    #[test]
    fn name_transforms_apply_prefix() {
        let t = text("color.brand", "#336699");
        assert_eq!(run(&[Transform::NameKebab], t.clone(), Some("token")).name, "token-color-brand");
        assert_eq!(run(&[Transform::NameCamel], t.clone(), Some("token")).name, "tokenColorBrand");
        assert_eq!(run(&[Transform::NameConstant], t.clone(), Some("token")).name, "TOKEN_COLOR_BRAND");
        assert_eq!(run(&[Transform::NameCamel], t, None).name, "colorBrand");
    }

    #[test]
    fn later_transforms_see_earlier_output() {
        // size/px turns 4 into 4px, which size/pxToPt then converts.
        let t = token("spacing.small", TokenValue::Number(4.into()));
        let out = run(&[Transform::SizePx, Transform::SizePxToPt], t.clone(), None);
        assert_eq!(out.value, TokenValue::from("4pt"));

        let reversed = run(&[Transform::SizePxToPt, Transform::SizePx], t, None);
        assert_eq!(reversed.value, TokenValue::from("4px"));
    }

    #[test]
    fn original_value_survives_transforms() {
        let t = text("spacing.small", "4px");
        let out = run(&[Transform::SizePxToDp], t, None);
        assert_eq!(out.original, TokenValue::from("4px"));
    }

    #[test]
    fn value_output_with_new_alias_syntax_is_rejected() {
        let t = text("size.gap", "4");
        let err = Transform::SizePx
            .checked_value(&t, "{size.base}px".to_string())
            .unwrap_err();
        match err {
            TokenError::Transform {
                transform,
                token,
                message,
            } => {
                assert_eq!(transform, "size/px");
                assert_eq!(token, "size.gap");
                assert!(message.contains("{size.base}px"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn value_output_keeping_existing_alias_syntax_is_accepted() {
        let t = text("size.gap", "{size.base}");
        let value = Transform::SizePx
            .checked_value(&t, "{size.base}px".to_string())
            .unwrap();
        assert_eq!(value, TokenValue::from("{size.base}px"));
    }

    #[test]
    fn braces_that_are_not_references_pass_the_check() {
        let t = text("font.family", "Inter");
        let value = Transform::ColorCss
            .checked_value(&t, "{ not a ref }".to_string())
            .unwrap();
        assert_eq!(value, TokenValue::from("{ not a ref }"));
    }

    #[test]
    fn builtin_groups_resolve() {
        let registry = Registry::builtin().unwrap();
        assert_eq!(
            registry.group("tokens-ios").unwrap(),
            &[Transform::AttributeCti, Transform::NameCamel, Transform::SizePxToPt]
        );
        assert_eq!(registry.group_names().count(), 7);
    }

    #[test]
    fn unknown_group_fails() {
        let registry = Registry::builtin().unwrap();
        assert!(matches!(
            registry.group("tokens-tv"),
            Err(TokenError::UnknownTransformGroup(_))
        ));
    }

    #[test]
    fn custom_group_rejects_unknown_transform() {
        let mut registry = Registry::builtin().unwrap();
        let err = registry.register("custom", &["name/cti/kebab", "size/rem"]).unwrap_err();
        assert!(matches!(err, TokenError::UnknownTransform(n) if n == "size/rem"));
    }
}
