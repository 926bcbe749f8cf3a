//! Colors and modifiers for entry text.
//!
//! Only the 16 ANSI colors (plus a few indexed greys) are used so the
//! terminal's own palette decides the final look. A light background
//! swaps in darker indexed colors for readability.

use ratatui::style::{Color, Modifier, Style};

use crate::document::{InlineStyle, LineType, SpanRole};

/// Guess the background from `COLORFGBG` (`"fg;bg"`, bg 7 or above is light).
pub fn background_is_light(colorfgbg: Option<&str>) -> bool {
    let Some(value) = colorfgbg else {
        return false;
    };
    let bg = value.rsplit(';').next().unwrap_or(value);
    bg.trim().parse::<u8>().is_ok_and(|bg| bg >= 7)
}

/// Base style for a laid-out line.
pub fn style_for_line_type(line_type: &LineType, light_bg: bool) -> Style {
    match line_type {
        LineType::Heading(1) => Style::default()
            .fg(if light_bg {
                Color::Indexed(24)
            } else {
                Color::Cyan
            })
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        LineType::Heading(_) => Style::default()
            .fg(if light_bg {
                Color::Indexed(22)
            } else {
                Color::Green
            })
            .add_modifier(Modifier::BOLD),
        LineType::Example => Style::default().fg(if light_bg {
            Color::Indexed(238)
        } else {
            Color::Indexed(250)
        }),
        LineType::Sense | LineType::Paragraph | LineType::Empty => Style::default(),
    }
}

fn style_for_role(base: Style, role: SpanRole, light_bg: bool) -> Style {
    match role {
        SpanRole::Ordinal => base
            .fg(if light_bg {
                Color::Indexed(58)
            } else {
                Color::Yellow
            })
            .add_modifier(Modifier::BOLD),
        SpanRole::PartOfSpeech => base
            .fg(if light_bg {
                Color::Indexed(90)
            } else {
                Color::Magenta
            })
            .add_modifier(Modifier::ITALIC),
        SpanRole::Gender => base.add_modifier(Modifier::DIM | Modifier::ITALIC),
        SpanRole::Bullet => base.fg(if light_bg {
            Color::Indexed(241)
        } else {
            Color::Indexed(244)
        }),
        SpanRole::Body | SpanRole::Title | SpanRole::Language => base,
    }
}

/// Style for an inline span, merged over its line's base style.
pub fn style_for_inline(base: Style, inline: InlineStyle, light_bg: bool) -> Style {
    let mut style = style_for_role(base, inline.role, light_bg);

    if inline.italic {
        style = style.add_modifier(Modifier::ITALIC);
    }
    if inline.bold {
        style = style.add_modifier(Modifier::BOLD);
    }
    if inline.underline {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    if inline.link {
        style = style
            .add_modifier(Modifier::UNDERLINED)
            .fg(if light_bg {
                Color::Blue
            } else {
                Color::LightBlue
            });
    }

    style
}

/// Highlight for the link that has keyboard focus.
pub fn focused_link_style(style: Style) -> Style {
    style.add_modifier(Modifier::REVERSED)
}

/// Status bar colors.
pub fn status_bar_style() -> Style {
    Style::default().bg(Color::DarkGray).fg(Color::White)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colorfgbg_detection() {
        assert!(!background_is_light(None));
        assert!(!background_is_light(Some("15;0")));
        assert!(background_is_light(Some("0;15")));
        assert!(background_is_light(Some("0;default;7")));
        assert!(!background_is_light(Some("garbage")));
    }

    #[test]
    fn test_headings_are_bold() {
        for level in [1, 2] {
            let style = style_for_line_type(&LineType::Heading(level), false);
            assert!(style.add_modifier.contains(Modifier::BOLD));
        }
    }

    #[test]
    fn test_link_is_underlined_blue() {
        let inline = InlineStyle {
            link: true,
            ..InlineStyle::default()
        };
        let dark = style_for_inline(Style::default(), inline, false);
        assert!(dark.add_modifier.contains(Modifier::UNDERLINED));
        assert_eq!(dark.fg, Some(Color::LightBlue));
        let light = style_for_inline(Style::default(), inline, true);
        assert_eq!(light.fg, Some(Color::Blue));
    }

    #[test]
    fn test_inline_flags_stack() {
        let inline = InlineStyle {
            bold: true,
            italic: true,
            underline: true,
            ..InlineStyle::default()
        };
        let style = style_for_inline(Style::default(), inline, false);
        assert!(
            style
                .add_modifier
                .contains(Modifier::BOLD | Modifier::ITALIC | Modifier::UNDERLINED)
        );
    }

    #[test]
    fn test_roles_get_distinct_styles() {
        let ordinal = style_for_inline(
            Style::default(),
            InlineStyle::with_role(SpanRole::Ordinal),
            false,
        );
        assert_eq!(ordinal.fg, Some(Color::Yellow));
        let pos = style_for_inline(
            Style::default(),
            InlineStyle::with_role(SpanRole::PartOfSpeech),
            false,
        );
        assert!(pos.add_modifier.contains(Modifier::ITALIC));
        let body = style_for_inline(Style::default(), InlineStyle::default(), false);
        assert_eq!(body, Style::default());
    }
}
