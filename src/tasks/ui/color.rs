use std::fmt;
use ansi_term::Style;

/// Chooses a style by comparing a value against descending thresholds.
pub struct ColorByRange<T> {
    /// `(pivot, style)` pairs, largest pivot first.
    pub divs: Vec<(T, Style)>,
    pub lowest: Style,
}

impl<T: PartialOrd> ColorByRange<T> {
    pub fn new(divs: Vec<(T, Style)>, lowest: Style) -> ColorByRange<T>
    { ColorByRange { divs, lowest } }

    pub fn style_of(&self, x: &T) -> Style {
        for &(ref pivot, style) in &self.divs {
            if x > pivot { return style; }
        }
        self.lowest
    }

    pub fn paint_as<D: fmt::Display>(&self, compared: &T, displayed: D) -> String
    { paint(self.style_of(compared), displayed).to_string() }
}

pub fn paint<T>(style: Style, value: T) -> Wrapper<T>
{ Wrapper { style, value } }

/// Colorizes the `Display` output of the wrapped value.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Wrapper<T> {
    style: Style,
    value: T,
}

impl<T: fmt::Display> fmt::Display for Wrapper<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.style.prefix())?;
        fmt::Display::fmt(&self.value, f)?;
        write!(f, "{}", self.style.suffix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ansi_term::Colour;

    #[test]
    fn range_picks_first_exceeded_pivot() {
        let red = Colour::Red.bold();
        let yellow = Colour::Yellow.normal();
        let colors = ColorByRange::new(vec![(3.0, red), (0.5, yellow)], Style::new());
        assert_eq!(colors.style_of(&10.0), red);
        assert_eq!(colors.style_of(&1.0), yellow);
        assert_eq!(colors.style_of(&0.1), Style::new());
    }

    #[test]
    fn plain_style_is_transparent() {
        assert_eq!(paint(Style::new(), 1.5).to_string(), "1.5");
    }
}
