//! CSS computed style
//!
//! [§ 4.4 Computed Values](https://www.w3.org/TR/css-cascade-4/#computed)
//! "The computed value is the result of resolving the specified value as
//! defined in the 'Computed Value' line of the property definition table,
//! generally absolutizing it in preparation for inheritance."

use std::str::FromStr;

use serde::Serialize;
use wren_common::warning::warn_once;

use crate::parser::{ComponentValue, Declaration};
use crate::tokenizer::CSSToken;

use super::display::Display;
use super::values::{
    AutoLength, BorderStyle, BoxSizing, ColorValue, DEFAULT_FONT_SIZE_PX, FontStyle, LengthValue,
    ListStyleType, Sides, TextAlign, Visibility, WhiteSpace, parse_auto_length, parse_color,
    parse_length,
};

/// [§ 4.2 line-height](https://www.w3.org/TR/css-inline-3/#line-height-property)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub enum LineHeight {
    /// "Tells user agents to set the used value to a 'reasonable' value
    /// based on the font of the element." Taken to be 1.2.
    #[default]
    Normal,
    /// A multiplier of the element's own font size; inherited as a number.
    Number(f32),
    /// An absolute line height.
    Length(LengthValue),
}

/// Multiplier used for `line-height: normal`.
pub const NORMAL_LINE_HEIGHT: f32 = 1.2;

/// [§ 3.1 border-width](https://www.w3.org/TR/css-backgrounds-3/#border-width)
/// "medium" is the initial value.
const MEDIUM_BORDER_PX: f32 = 3.0;

/// Inputs for resolving relative values while styling one element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleContext {
    /// Computed font size of the parent element.
    pub parent_font_size: f32,
    /// Computed font size of the root element.
    pub root_font_size: f32,
    /// Viewport width and height in px.
    pub viewport: (f32, f32),
}

impl StyleContext {
    /// Context for the root element.
    #[must_use]
    pub const fn root(viewport: (f32, f32)) -> Self {
        Self {
            parent_font_size: DEFAULT_FONT_SIZE_PX,
            root_font_size: DEFAULT_FONT_SIZE_PX,
            viewport,
        }
    }
}

/// Computed styles for an element.
///
/// Every property holds a value: initial values come from [`Default`],
/// inherited properties are copied by [`ComputedStyle::inherit_from`].
/// Font-relative and viewport lengths are absolute after
/// [`ComputedStyle::finalize`]; percentages are resolved in layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComputedStyle {
    /// [§ 2 display](https://www.w3.org/TR/css-display-3/#the-display-properties)
    pub display: Display,
    /// [§ 3.1 color](https://www.w3.org/TR/css-color-4/#the-color-property) (inherited)
    pub color: ColorValue,
    /// [§ 3.10 background-color](https://www.w3.org/TR/css-backgrounds-3/#background-color)
    pub background_color: ColorValue,
    /// [§ 3.2 opacity](https://www.w3.org/TR/css-color-4/#transparency), 0..=1.
    pub opacity: f32,
    /// First family of `font-family` (inherited).
    pub font_family: String,
    /// Font size in px (inherited).
    pub font_size: f32,
    /// Numeric weight 1..=1000 (inherited).
    pub font_weight: u16,
    /// `font-style` (inherited).
    pub font_style: FontStyle,
    /// `line-height` (inherited).
    pub line_height: LineHeight,
    /// `text-align` (inherited).
    pub text_align: TextAlign,
    /// `white-space` (inherited).
    pub white_space: WhiteSpace,
    /// `list-style-type` (inherited).
    pub list_style_type: ListStyleType,
    /// `visibility` (inherited).
    pub visibility: Visibility,
    /// [§ 8.3 margin](https://www.w3.org/TR/CSS2/box.html#margin-properties)
    pub margin: Sides<AutoLength>,
    /// [§ 8.4 padding](https://www.w3.org/TR/CSS2/box.html#padding-properties)
    pub padding: Sides<LengthValue>,
    /// Border widths; zero where the style is `none` or `hidden`.
    pub border_width: Sides<LengthValue>,
    /// Border styles.
    pub border_style: Sides<BorderStyle>,
    /// Border colors; `None` is `currentColor`.
    pub border_color: Sides<Option<ColorValue>>,
    /// [§ 10.2 width](https://www.w3.org/TR/CSS2/visudet.html#the-width-property)
    pub width: AutoLength,
    /// [§ 10.5 height](https://www.w3.org/TR/CSS2/visudet.html#the-height-property)
    pub height: AutoLength,
    /// [§ 10.4 min-width](https://www.w3.org/TR/CSS2/visudet.html#min-max-widths)
    pub min_width: LengthValue,
    /// `min-height`
    pub min_height: LengthValue,
    /// `max-width`; `None` is `none`.
    pub max_width: Option<LengthValue>,
    /// `max-height`; `None` is `none`.
    pub max_height: Option<LengthValue>,
    /// [§ 4.4 box-sizing](https://www.w3.org/TR/css-sizing-3/#box-sizing)
    pub box_sizing: BoxSizing,
    /// [§ 17.6.1 border-spacing](https://www.w3.org/TR/CSS2/tables.html#separated-borders)
    /// Horizontal spacing, also used vertically (inherited).
    pub border_spacing: LengthValue,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            display: Display::Inline,
            color: ColorValue::BLACK,
            background_color: ColorValue::TRANSPARENT,
            opacity: 1.0,
            font_family: "serif".to_string(),
            font_size: DEFAULT_FONT_SIZE_PX,
            font_weight: 400,
            font_style: FontStyle::Normal,
            line_height: LineHeight::Normal,
            text_align: TextAlign::Left,
            white_space: WhiteSpace::Normal,
            list_style_type: ListStyleType::Disc,
            visibility: Visibility::Visible,
            margin: Sides::all(AutoLength::Length(LengthValue::ZERO)),
            padding: Sides::all(LengthValue::ZERO),
            border_width: Sides::all(LengthValue::Px(MEDIUM_BORDER_PX)),
            border_style: Sides::all(BorderStyle::None),
            border_color: Sides::all(None),
            width: AutoLength::Auto,
            height: AutoLength::Auto,
            min_width: LengthValue::ZERO,
            min_height: LengthValue::ZERO,
            max_width: None,
            max_height: None,
            box_sizing: BoxSizing::ContentBox,
            border_spacing: LengthValue::ZERO,
        }
    }
}

/// Result of applying one declaration.
enum Applied {
    Ok,
    Invalid,
    UnknownProperty,
}

impl From<Option<()>> for Applied {
    fn from(value: Option<()>) -> Self {
        if value.is_some() { Self::Ok } else { Self::Invalid }
    }
}

/// [§ 7.1 Inherited properties](https://www.w3.org/TR/css-cascade-4/#inherited-property)
fn is_inherited(property: &str) -> bool {
    matches!(
        property,
        "color"
            | "font"
            | "font-family"
            | "font-size"
            | "font-weight"
            | "font-style"
            | "line-height"
            | "text-align"
            | "white-space"
            | "list-style"
            | "list-style-type"
            | "visibility"
            | "border-spacing"
    )
}

impl ComputedStyle {
    /// [§ 7.2 Inheritance](https://www.w3.org/TR/css-cascade-4/#inheriting)
    ///
    /// Initial values everywhere, except inherited properties which take the
    /// parent's computed value.
    #[must_use]
    pub fn inherit_from(parent: &Self) -> Self {
        Self {
            color: parent.color,
            font_family: parent.font_family.clone(),
            font_size: parent.font_size,
            font_weight: parent.font_weight,
            font_style: parent.font_style,
            line_height: parent.line_height,
            text_align: parent.text_align,
            white_space: parent.white_space,
            list_style_type: parent.list_style_type,
            visibility: parent.visibility,
            border_spacing: parent.border_spacing,
            ..Self::default()
        }
    }

    /// Used line height in px.
    #[must_use]
    pub fn line_height_px(&self) -> f32 {
        match self.line_height {
            LineHeight::Normal => self.font_size * NORMAL_LINE_HEIGHT,
            LineHeight::Number(n) => self.font_size * n,
            LineHeight::Length(l) => l.resolve(Some(self.font_size)).unwrap_or(0.0),
        }
    }

    /// Used border color for one side.
    #[must_use]
    pub fn border_color_used(&self, color: Option<ColorValue>) -> ColorValue {
        color.unwrap_or(self.color)
    }

    /// [§ 6.4.1 Cascaded values](https://www.w3.org/TR/css-cascade-4/#cascaded)
    ///
    /// Apply one declaration on top of the current values. Invalid values and
    /// unknown properties are ignored with a deduplicated warning.
    pub fn apply_declaration(&mut self, decl: &Declaration, parent: &Self, ctx: &StyleContext) {
        let values: Vec<&ComponentValue> = decl.value.iter().filter(|v| !v.is_whitespace()).collect();

        // [§ 7.3 Explicit Defaulting](https://www.w3.org/TR/css-cascade-4/#defaulting-keywords)
        if let [single] = values.as_slice()
            && let Some(CSSToken::Ident(keyword)) = single.token()
        {
            let source = match keyword.to_ascii_lowercase().as_str() {
                "inherit" => Some(parent.clone()),
                "initial" => Some(Self::default()),
                "unset" if is_inherited(&decl.name) => Some(parent.clone()),
                "unset" => Some(Self::default()),
                _ => None,
            };
            if let Some(source) = source {
                if !self.copy_property(&decl.name, &source) {
                    warn_once("CSS", &format!("unsupported property '{}'", decl.name));
                }
                return;
            }
        }

        match self.apply_value(&decl.name, &values, parent, ctx) {
            Applied::Ok => {}
            Applied::Invalid => {
                let text: String = decl
                    .value
                    .iter()
                    .filter_map(ComponentValue::token)
                    .map(ToString::to_string)
                    .collect();
                warn_once("CSS", &format!("invalid value for '{}': {}", decl.name, text.trim()));
            }
            Applied::UnknownProperty => {
                warn_once("CSS", &format!("unsupported property '{}'", decl.name));
            }
        }
    }

    /// [§ 4.4 Computed Values](https://www.w3.org/TR/css-cascade-4/#computed)
    ///
    /// Absolutize font-relative and viewport lengths once all declarations
    /// are applied, and zero the widths of invisible borders.
    pub fn finalize(&mut self, ctx: &StyleContext) {
        let font_size = self.font_size;
        let abs = |l: LengthValue| l.absolutize(font_size, ctx.root_font_size, ctx.viewport);
        let abs_auto = |l: AutoLength| match l {
            AutoLength::Auto => AutoLength::Auto,
            AutoLength::Length(l) => AutoLength::Length(abs(l)),
        };

        self.margin = self.margin.map(abs_auto);
        self.padding = self.padding.map(abs);
        self.width = abs_auto(self.width);
        self.height = abs_auto(self.height);
        self.min_width = abs(self.min_width);
        self.min_height = abs(self.min_height);
        self.max_width = self.max_width.map(abs);
        self.max_height = self.max_height.map(abs);
        self.border_spacing = abs(self.border_spacing);

        // "Computed value: absolute length; 0 if the border style is none or hidden"
        let styles = self.border_style;
        let widths = self.border_width.map(abs);
        self.border_width = Sides {
            top: visible_width(widths.top, styles.top),
            right: visible_width(widths.right, styles.right),
            bottom: visible_width(widths.bottom, styles.bottom),
            left: visible_width(widths.left, styles.left),
        };

        // Percentages and lengths compute to an absolute line height.
        if let LineHeight::Length(l) = self.line_height {
            let px = match l {
                LengthValue::Percent(p) => LengthValue::Px(p * font_size / 100.0),
                other => abs(other),
            };
            self.line_height = LineHeight::Length(px);
        }
    }

    fn apply_value(
        &mut self,
        name: &str,
        values: &[&ComponentValue],
        parent: &Self,
        ctx: &StyleContext,
    ) -> Applied {
        let single = match values {
            [v] => Some(*v),
            _ => None,
        };
        let keyword = single.and_then(|v| match v.token() {
            Some(CSSToken::Ident(k)) => Some(k.as_str()),
            _ => None,
        });

        match name {
            "display" => keyword
                .and_then(|k| Display::from_str(k).ok())
                .map(|d| self.display = d)
                .into(),
            "color" => {
                if keyword.is_some_and(|k| k.eq_ignore_ascii_case("currentcolor")) {
                    self.color = parent.color;
                    return Applied::Ok;
                }
                single.and_then(parse_color).map(|c| self.color = c).into()
            }
            "background-color" => single
                .and_then(|v| self.parse_color_or_current(v))
                .map(|c| self.background_color = c)
                .into(),
            "background" => {
                // Only the color layer is rendered; other components
                // (images, positions) are accepted and ignored.
                self.background_color = values
                    .iter()
                    .find_map(|v| self.parse_color_or_current(v))
                    .unwrap_or(ColorValue::TRANSPARENT);
                Applied::Ok
            }
            "opacity" => single
                .and_then(|v| match v.token()? {
                    CSSToken::Number(n) => Some(*n as f32),
                    CSSToken::Percentage(p) => Some(*p as f32 / 100.0),
                    _ => None,
                })
                .map(|o| self.opacity = o.clamp(0.0, 1.0))
                .into(),
            "font-family" => parse_font_family(values).map(|f| self.font_family = f).into(),
            "font-size" => single
                .and_then(|v| parse_font_size(v, parent.font_size, ctx))
                .map(|px| self.font_size = px)
                .into(),
            "font-weight" => single
                .and_then(|v| parse_font_weight(v, parent.font_weight))
                .map(|w| self.font_weight = w)
                .into(),
            "font-style" => values
                .first()
                .and_then(|v| keyword_of(v))
                .and_then(|k| FontStyle::from_str(k).ok())
                .map(|s| self.font_style = s)
                .into(),
            "font" => self.apply_font_shorthand(values, parent, ctx).into(),
            "line-height" => single.and_then(parse_line_height).map(|l| self.line_height = l).into(),
            "text-align" => parse_keyword::<TextAlign>(keyword).map(|v| self.text_align = v).into(),
            "white-space" => parse_keyword::<WhiteSpace>(keyword).map(|v| self.white_space = v).into(),
            "list-style-type" => parse_keyword::<ListStyleType>(keyword).map(|v| self.list_style_type = v).into(),
            "list-style" => {
                // `list-style: square inside` - pick out the type keyword.
                let found = values
                    .iter()
                    .filter_map(|v| keyword_of(v))
                    .find_map(|k| ListStyleType::from_str(k).ok());
                self.list_style_type = found.unwrap_or_default();
                Applied::Ok
            }
            "visibility" => parse_keyword::<Visibility>(keyword).map(|v| self.visibility = v).into(),
            "box-sizing" => parse_keyword::<BoxSizing>(keyword).map(|v| self.box_sizing = v).into(),
            "margin" => parse_sides(values, parse_auto_length)
                .map(|m| self.margin = m)
                .into(),
            "padding" => parse_sides(values, parse_non_negative)
                .map(|p| self.padding = p)
                .into(),
            "border-width" => parse_sides(values, parse_border_width)
                .map(|w| self.border_width = w)
                .into(),
            "border-style" => parse_sides(values, |v| keyword_of(v).and_then(|k| BorderStyle::from_str(k).ok()))
                .map(|s| self.border_style = s)
                .into(),
            "border-color" => parse_sides(values, |v| self.parse_border_color(v))
                .map(|c| self.border_color = c)
                .into(),
            "border" => self.apply_border_shorthand(values, None).into(),
            "width" => single
                .and_then(parse_auto_length)
                .filter(not_negative_auto)
                .map(|w| self.width = w)
                .into(),
            "height" => single
                .and_then(parse_auto_length)
                .filter(not_negative_auto)
                .map(|h| self.height = h)
                .into(),
            "min-width" => single.and_then(parse_min_size).map(|l| self.min_width = l).into(),
            "min-height" => single.and_then(parse_min_size).map(|l| self.min_height = l).into(),
            "max-width" => single.and_then(parse_max_size).map(|l| self.max_width = l).into(),
            "max-height" => single.and_then(parse_max_size).map(|l| self.max_height = l).into(),
            "border-spacing" => match values {
                [h] | [h, _] => parse_non_negative(h).map(|l| self.border_spacing = l).into(),
                _ => Applied::Invalid,
            },
            _ => self.apply_sided_longhand(name, single, values),
        }
    }

    /// `margin-top`, `padding-left`, `border-right`, `border-bottom-color`, ...
    fn apply_sided_longhand(
        &mut self,
        name: &str,
        single: Option<&ComponentValue>,
        values: &[&ComponentValue],
    ) -> Applied {
        if let Some(side) = name.strip_prefix("margin-") {
            let value = single.and_then(parse_auto_length);
            return match (self.margin.side_mut(side), value) {
                (Some(slot), Some(v)) => {
                    *slot = v;
                    Applied::Ok
                }
                (Some(_), None) => Applied::Invalid,
                (None, _) => Applied::UnknownProperty,
            };
        }
        if let Some(side) = name.strip_prefix("padding-") {
            let value = single.and_then(parse_non_negative);
            return match (self.padding.side_mut(side), value) {
                (Some(slot), Some(v)) => {
                    *slot = v;
                    Applied::Ok
                }
                (Some(_), None) => Applied::Invalid,
                (None, _) => Applied::UnknownProperty,
            };
        }
        let Some(rest) = name.strip_prefix("border-") else {
            return Applied::UnknownProperty;
        };
        let (side, part) = rest.split_once('-').unwrap_or((rest, ""));
        if !matches!(side, "top" | "right" | "bottom" | "left") {
            return Applied::UnknownProperty;
        }
        match part {
            "" => self.apply_border_shorthand(values, Some(side)).into(),
            "width" => match (single.and_then(parse_border_width), self.border_width.side_mut(side)) {
                (Some(v), Some(slot)) => {
                    *slot = v;
                    Applied::Ok
                }
                _ => Applied::Invalid,
            },
            "style" => {
                let value = single
                    .and_then(keyword_of)
                    .and_then(|k| BorderStyle::from_str(k).ok());
                match (value, self.border_style.side_mut(side)) {
                    (Some(v), Some(slot)) => {
                        *slot = v;
                        Applied::Ok
                    }
                    _ => Applied::Invalid,
                }
            }
            "color" => {
                let value = single.and_then(|v| self.parse_border_color(v));
                match (value, self.border_color.side_mut(side)) {
                    (Some(v), Some(slot)) => {
                        *slot = v;
                        Applied::Ok
                    }
                    _ => Applied::Invalid,
                }
            }
            _ => Applied::UnknownProperty,
        }
    }

    /// [§ 4.4 border shorthands](https://www.w3.org/TR/css-backgrounds-3/#border-shorthands)
    ///
    /// "<line-width> || <line-style> || <color>" in any order. Omitted
    /// components reset to their initial values.
    fn apply_border_shorthand(&mut self, values: &[&ComponentValue], side: Option<&str>) -> Option<()> {
        let mut width = None;
        let mut style = None;
        let mut color = None;
        for v in values {
            if width.is_none()
                && let Some(w) = parse_border_width(v)
            {
                width = Some(w);
            } else if style.is_none()
                && let Some(s) = keyword_of(v).and_then(|k| BorderStyle::from_str(k).ok())
            {
                style = Some(s);
            } else if color.is_none()
                && let Some(c) = self.parse_border_color(v)
            {
                color = Some(c);
            } else {
                return None;
            }
        }
        if values.is_empty() {
            return None;
        }

        let width = width.unwrap_or(LengthValue::Px(MEDIUM_BORDER_PX));
        let style = style.unwrap_or_default();
        let color = color.flatten();
        match side {
            None => {
                self.border_width = Sides::all(width);
                self.border_style = Sides::all(style);
                self.border_color = Sides::all(color);
            }
            Some(side) => {
                *self.border_width.side_mut(side)? = width;
                *self.border_style.side_mut(side)? = style;
                *self.border_color.side_mut(side)? = color;
            }
        }
        Some(())
    }

    /// [§ 2 font shorthand](https://www.w3.org/TR/css-fonts-4/#font-prop)
    ///
    /// "[ <font-style> || <font-variant-css2> || <font-weight> ]?
    ///  <font-size> [ / <line-height> ]? <font-family>"
    fn apply_font_shorthand(
        &mut self,
        values: &[&ComponentValue],
        parent: &Self,
        ctx: &StyleContext,
    ) -> Option<()> {
        let mut style = FontStyle::Normal;
        let mut weight = 400;
        let mut index = 0;
        let size = loop {
            let v = values.get(index)?;
            index += 1;
            if let Some(k) = keyword_of(v) {
                if k.eq_ignore_ascii_case("normal") || k.eq_ignore_ascii_case("small-caps") {
                    continue;
                }
                if let Ok(s) = FontStyle::from_str(k) {
                    style = s;
                    continue;
                }
            }
            if let Some(w) = parse_font_weight(v, parent.font_weight) {
                weight = w;
                continue;
            }
            break parse_font_size(v, parent.font_size, ctx)?;
        };

        let mut line_height = LineHeight::Normal;
        if values.get(index).and_then(|v| v.token()) == Some(&CSSToken::Delim('/')) {
            line_height = parse_line_height(values.get(index + 1)?)?;
            index += 2;
        }
        let family = parse_font_family(&values[index..])?;

        self.font_style = style;
        self.font_weight = weight;
        self.font_size = size;
        self.line_height = line_height;
        self.font_family = family;
        Some(())
    }

    /// `currentColor` resolves to the `color` applied so far.
    fn parse_color_or_current(&self, v: &ComponentValue) -> Option<ColorValue> {
        match keyword_of(v) {
            Some(k) if k.eq_ignore_ascii_case("currentcolor") => Some(self.color),
            _ => parse_color(v),
        }
    }

    /// `Some(None)` is `currentColor`, kept symbolic for borders.
    fn parse_border_color(&self, v: &ComponentValue) -> Option<Option<ColorValue>> {
        match keyword_of(v) {
            Some(k) if k.eq_ignore_ascii_case("currentcolor") => Some(None),
            _ => parse_color(v).map(Some),
        }
    }

    /// Copy one property (or every longhand of a shorthand) from `from`.
    /// Returns false for an unknown property name.
    fn copy_property(&mut self, name: &str, from: &Self) -> bool {
        match name {
            "display" => self.display = from.display,
            "color" => self.color = from.color,
            "background" | "background-color" => self.background_color = from.background_color,
            "opacity" => self.opacity = from.opacity,
            "font" => {
                self.font_family.clone_from(&from.font_family);
                self.font_size = from.font_size;
                self.font_weight = from.font_weight;
                self.font_style = from.font_style;
                self.line_height = from.line_height;
            }
            "font-family" => self.font_family.clone_from(&from.font_family),
            "font-size" => self.font_size = from.font_size,
            "font-weight" => self.font_weight = from.font_weight,
            "font-style" => self.font_style = from.font_style,
            "line-height" => self.line_height = from.line_height,
            "text-align" => self.text_align = from.text_align,
            "white-space" => self.white_space = from.white_space,
            "list-style" | "list-style-type" => self.list_style_type = from.list_style_type,
            "visibility" => self.visibility = from.visibility,
            "box-sizing" => self.box_sizing = from.box_sizing,
            "margin" => self.margin = from.margin,
            "padding" => self.padding = from.padding,
            "border" => {
                self.border_width = from.border_width;
                self.border_style = from.border_style;
                self.border_color = from.border_color;
            }
            "border-width" => self.border_width = from.border_width,
            "border-style" => self.border_style = from.border_style,
            "border-color" => self.border_color = from.border_color,
            "width" => self.width = from.width,
            "height" => self.height = from.height,
            "min-width" => self.min_width = from.min_width,
            "min-height" => self.min_height = from.min_height,
            "max-width" => self.max_width = from.max_width,
            "max-height" => self.max_height = from.max_height,
            "border-spacing" => self.border_spacing = from.border_spacing,
            _ => return self.copy_sided_longhand(name, from),
        }
        true
    }

    fn copy_sided_longhand(&mut self, name: &str, from: &Self) -> bool {
        fn copy<T: Copy>(dst: &mut Sides<T>, src: &Sides<T>, side: &str) -> bool {
            let mut src = *src;
            match (dst.side_mut(side), src.side_mut(side)) {
                (Some(d), Some(s)) => {
                    *d = *s;
                    true
                }
                _ => false,
            }
        }

        if let Some(side) = name.strip_prefix("margin-") {
            return copy(&mut self.margin, &from.margin, side);
        }
        if let Some(side) = name.strip_prefix("padding-") {
            return copy(&mut self.padding, &from.padding, side);
        }
        let Some(rest) = name.strip_prefix("border-") else {
            return false;
        };
        let (side, part) = rest.split_once('-').unwrap_or((rest, ""));
        match part {
            "" => {
                copy(&mut self.border_width, &from.border_width, side)
                    && copy(&mut self.border_style, &from.border_style, side)
                    && copy(&mut self.border_color, &from.border_color, side)
            }
            "width" => copy(&mut self.border_width, &from.border_width, side),
            "style" => copy(&mut self.border_style, &from.border_style, side),
            "color" => copy(&mut self.border_color, &from.border_color, side),
            _ => false,
        }
    }
}

fn visible_width(width: LengthValue, style: BorderStyle) -> LengthValue {
    if style.is_visible() { width } else { LengthValue::ZERO }
}

fn keyword_of(v: &ComponentValue) -> Option<&str> {
    match v.token()? {
        CSSToken::Ident(k) => Some(k.as_str()),
        _ => None,
    }
}

fn parse_keyword<T: FromStr>(keyword: Option<&str>) -> Option<T> {
    keyword.and_then(|k| T::from_str(k).ok())
}

fn parse_sides<T: Copy>(
    values: &[&ComponentValue],
    parse: impl Fn(&ComponentValue) -> Option<T>,
) -> Option<Sides<T>> {
    let parsed: Option<Vec<T>> = values.iter().map(|&v| parse(v)).collect();
    Sides::from_shorthand(&parsed?)
}

fn is_negative(l: LengthValue) -> bool {
    match l {
        LengthValue::Px(v)
        | LengthValue::Em(v)
        | LengthValue::Rem(v)
        | LengthValue::Percent(v)
        | LengthValue::Vw(v)
        | LengthValue::Vh(v) => v < 0.0,
    }
}

fn not_negative_auto(l: &AutoLength) -> bool {
    l.length().is_none_or(|l| !is_negative(l))
}

fn parse_non_negative(v: &ComponentValue) -> Option<LengthValue> {
    parse_length(v).filter(|l| !is_negative(*l))
}

/// `auto` is the initial value of `min-width` in CSS Sizing 3 and behaves as
/// zero for the layouts implemented here.
fn parse_min_size(v: &ComponentValue) -> Option<LengthValue> {
    match keyword_of(v) {
        Some(k) if k.eq_ignore_ascii_case("auto") => Some(LengthValue::ZERO),
        _ => parse_non_negative(v),
    }
}

fn parse_max_size(v: &ComponentValue) -> Option<Option<LengthValue>> {
    match keyword_of(v) {
        Some(k) if k.eq_ignore_ascii_case("none") => Some(None),
        _ => parse_non_negative(v).map(Some),
    }
}

/// [§ 3.1 border-width](https://www.w3.org/TR/css-backgrounds-3/#border-width)
/// "thin", "medium" and "thick" are 1px, 3px and 5px.
fn parse_border_width(v: &ComponentValue) -> Option<LengthValue> {
    match keyword_of(v).map(str::to_ascii_lowercase).as_deref() {
        Some("thin") => Some(LengthValue::Px(1.0)),
        Some("medium") => Some(LengthValue::Px(MEDIUM_BORDER_PX)),
        Some("thick") => Some(LengthValue::Px(5.0)),
        _ => parse_non_negative(v).filter(|l| !l.is_percent()),
    }
}

/// [§ 3.5 font-size](https://www.w3.org/TR/css-fonts-4/#font-size-prop)
///
/// Computed immediately to px: `em` and percentages against the parent's
/// font size.
fn parse_font_size(v: &ComponentValue, parent_size: f32, ctx: &StyleContext) -> Option<f32> {
    if let Some(keyword) = keyword_of(v) {
        // [§ 3.5.1 absolute-size](https://www.w3.org/TR/css-fonts-4/#absolute-size-mapping)
        return Some(match keyword.to_ascii_lowercase().as_str() {
            "xx-small" => 9.0,
            "x-small" => 10.0,
            "small" => 13.0,
            "medium" => DEFAULT_FONT_SIZE_PX,
            "large" => 18.0,
            "x-large" => 24.0,
            "xx-large" => 32.0,
            "xxx-large" => 48.0,
            "smaller" => parent_size / 1.2,
            "larger" => parent_size * 1.2,
            _ => return None,
        });
    }
    let px = match parse_non_negative(v)? {
        LengthValue::Em(em) => em * parent_size,
        LengthValue::Percent(p) => p * parent_size / 100.0,
        other => other
            .absolutize(parent_size, ctx.root_font_size, ctx.viewport)
            .resolve(None)?,
    };
    Some(px)
}

/// [§ 3.2 font-weight](https://www.w3.org/TR/css-fonts-4/#font-weight-prop)
fn parse_font_weight(v: &ComponentValue, parent_weight: u16) -> Option<u16> {
    match v.token()? {
        CSSToken::Number(n) if (1.0..=1000.0).contains(n) => Some(*n as u16),
        CSSToken::Ident(k) => match k.to_ascii_lowercase().as_str() {
            "normal" => Some(400),
            "bold" => Some(700),
            // [§ 3.2.1 Relative Weights](https://www.w3.org/TR/css-fonts-4/#relative-weights)
            "bolder" => Some(match parent_weight {
                0..350 => 400,
                350..550 => 700,
                _ => 900,
            }),
            "lighter" => Some(match parent_weight {
                0..550 => 100,
                550..750 => 400,
                _ => 700,
            }),
            _ => None,
        },
        _ => None,
    }
}

fn parse_line_height(v: &ComponentValue) -> Option<LineHeight> {
    match v.token()? {
        CSSToken::Ident(k) if k.eq_ignore_ascii_case("normal") => Some(LineHeight::Normal),
        CSSToken::Number(n) if *n >= 0.0 => Some(LineHeight::Number(*n as f32)),
        _ => parse_non_negative(v).map(LineHeight::Length),
    }
}

/// [§ 3.1 font-family](https://www.w3.org/TR/css-fonts-4/#font-family-prop)
///
/// The first family in the list: a string, or a run of identifiers joined
/// by single spaces.
fn parse_font_family(values: &[&ComponentValue]) -> Option<String> {
    let mut family = Vec::new();
    for v in values {
        match v.token()? {
            CSSToken::String(s) if family.is_empty() => return Some(s.clone()),
            CSSToken::Ident(i) => family.push(i.as_str()),
            CSSToken::Comma => break,
            _ => return None,
        }
    }
    (!family.is_empty()).then(|| family.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_declarations;

    fn styled(css: &str) -> ComputedStyle {
        styled_with_parent(css, &ComputedStyle::default())
    }

    fn styled_with_parent(css: &str, parent: &ComputedStyle) -> ComputedStyle {
        let ctx = StyleContext {
            parent_font_size: parent.font_size,
            root_font_size: DEFAULT_FONT_SIZE_PX,
            viewport: (1000.0, 800.0),
        };
        let mut style = ComputedStyle::inherit_from(parent);
        for decl in parse_declarations(css) {
            style.apply_declaration(&decl, parent, &ctx);
        }
        style.finalize(&ctx);
        style
    }

    #[test]
    fn test_margin_shorthand_expansion() {
        let s = styled("margin: 1px 2px 3px");
        assert_eq!(s.margin.top, AutoLength::Length(LengthValue::Px(1.0)));
        assert_eq!(s.margin.right, AutoLength::Length(LengthValue::Px(2.0)));
        assert_eq!(s.margin.bottom, AutoLength::Length(LengthValue::Px(3.0)));
        assert_eq!(s.margin.left, AutoLength::Length(LengthValue::Px(2.0)));

        let s = styled("margin: 0 auto; margin-left: 5px");
        assert_eq!(s.margin.right, AutoLength::Auto);
        assert_eq!(s.margin.left, AutoLength::Length(LengthValue::Px(5.0)));
    }

    #[test]
    fn test_em_resolves_against_own_font_size() {
        let mut parent = ComputedStyle::default();
        parent.font_size = 10.0;
        let s = styled_with_parent("padding: 1em; font-size: 2em", &parent);
        assert_eq!(s.font_size, 20.0);
        assert_eq!(s.padding.top, LengthValue::Px(20.0));
    }

    #[test]
    fn test_viewport_units() {
        let s = styled("width: 10vw; height: 50vh");
        assert_eq!(s.width, AutoLength::Length(LengthValue::Px(100.0)));
        assert_eq!(s.height, AutoLength::Length(LengthValue::Px(400.0)));
    }

    #[test]
    fn test_border_width_zero_without_style() {
        let s = styled("border-width: 4px");
        assert_eq!(s.border_width.top, LengthValue::ZERO);
        let s = styled("border: 2px solid red");
        assert_eq!(s.border_width.left, LengthValue::Px(2.0));
        assert_eq!(s.border_color.left, Some(ColorValue::rgb(255, 0, 0)));
        let s = styled("border-top: dashed");
        assert_eq!(s.border_width.top, LengthValue::Px(MEDIUM_BORDER_PX));
        assert_eq!(s.border_width.bottom, LengthValue::ZERO);
    }

    #[test]
    fn test_inherit_and_initial_keywords() {
        let mut parent = ComputedStyle::default();
        parent.width = AutoLength::Length(LengthValue::Px(42.0));
        parent.color = ColorValue::WHITE;
        let s = styled_with_parent("width: inherit; color: initial", &parent);
        assert_eq!(s.width, AutoLength::Length(LengthValue::Px(42.0)));
        assert_eq!(s.color, ColorValue::BLACK);
    }

    #[test]
    fn test_inherited_properties_flow_to_children() {
        let parent = styled("color: blue; text-align: center; width: 10px");
        let child = ComputedStyle::inherit_from(&parent);
        assert_eq!(child.color, ColorValue::rgb(0, 0, 255));
        assert_eq!(child.text_align, TextAlign::Center);
        assert_eq!(child.width, AutoLength::Auto);
    }

    #[test]
    fn test_invalid_values_keep_previous() {
        let s = styled("width: 10px; width: red; display: sideways; padding: -1px");
        assert_eq!(s.width, AutoLength::Length(LengthValue::Px(10.0)));
        assert_eq!(s.display, Display::Inline);
        assert_eq!(s.padding.top, LengthValue::ZERO);
    }

    #[test]
    fn test_font_shorthand() {
        let s = styled("font: italic bold 12px/30px Georgia, serif");
        assert_eq!(s.font_style, FontStyle::Italic);
        assert_eq!(s.font_weight, 700);
        assert_eq!(s.font_size, 12.0);
        assert_eq!(s.line_height_px(), 30.0);
        assert_eq!(s.font_family, "Georgia");
    }

    #[test]
    fn test_line_height_forms() {
        assert_eq!(styled("line-height: 2").line_height_px(), 32.0);
        assert_eq!(styled("line-height: 150%").line_height_px(), 24.0);
        assert_eq!(styled("line-height: normal").line_height_px(), 16.0 * NORMAL_LINE_HEIGHT);
    }

    #[test]
    fn test_max_none_and_min_auto() {
        let s = styled("max-width: 50%; max-height: none; min-width: auto");
        assert_eq!(s.max_width, Some(LengthValue::Percent(50.0)));
        assert_eq!(s.max_height, None);
        assert_eq!(s.min_width, LengthValue::ZERO);
    }

    #[test]
    fn test_background_shorthand_takes_color() {
        let s = styled("background: url(x.png) no-repeat #00ff00");
        assert_eq!(s.background_color, ColorValue::rgb(0, 255, 0));
    }
}
