use std::io::Write;

use crossterm::{queue, style};

/// Print a status-line item, bolding any text inside `[...]` brackets.
/// Text outside brackets is printed dim.
pub fn print_menu_item(out: &mut impl Write, item: &str) -> anyhow::Result<()> {
    let mut rest = item;
    while let Some(open) = rest.find('[') {
        let Some(close) = rest[open..].find(']').map(|c| open + c) else {
            break;
        };
        print_with(out, &rest[..open], style::Attribute::Dim)?;
        print_with(out, &rest[open..=close], style::Attribute::Bold)?;
        rest = &rest[close + 1..];
    }
    print_with(out, rest, style::Attribute::Dim)
}

fn print_with(out: &mut impl Write, text: &str, attr: style::Attribute) -> anyhow::Result<()> {
    if text.is_empty() {
        return Ok(());
    }
    queue!(
        out,
        style::SetAttribute(attr),
        style::Print(text),
        style::SetAttribute(style::Attribute::Reset),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(item: &str) -> String {
        let mut buf = Vec::new();
        print_menu_item(&mut buf, item).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_brackets_are_bold() {
        let out = render("[Esc] quit");
        let bold = out.find("\x1b[1m").unwrap();
        let key = out.find("[Esc]").unwrap();
        let dim = out.find("\x1b[2m").unwrap();
        assert!(bold < key && key < dim);
        assert!(out.contains(" quit"));
    }

    #[test]
    fn test_unclosed_bracket_prints_plain() {
        let out = render("tick [42");
        assert!(out.contains("tick [42"));
        assert!(!out.contains("\x1b[1m"));
    }
}
