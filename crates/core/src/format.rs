//! Value and range label text

use std::fmt;
use std::rc::Rc;

use rg_gauge_types::GaugeConfig;

const SUFFIXES: [&str; 7] = ["", "K", "M", "G", "T", "P", "E"];

/// Custom value renderer; returning `None` falls back to the built-in rules
pub type TextRenderer = Rc<dyn Fn(f64) -> Option<String>>;

/// Shorten `value` with a metric suffix, keeping `decimals` places at most.
///
/// `1234567` with 2 decimals becomes `1.23M`. Rounds half up.
pub fn human_friendly(value: f64, decimals: usize) -> String {
    let mut n = value;
    let mut i = 0;
    while (n >= 1000.0 || n <= -1000.0) && i + 1 < SUFFIXES.len() {
        n /= 1000.0;
        i += 1;
    }

    let scale = 10f64.powi(decimals as i32);
    let mut rounded = (n * scale + 0.5).floor() / scale;
    if rounded == 0.0 {
        // No "-0"
        rounded = 0.0;
    }
    format!("{}{}", rounded, SUFFIXES[i])
}

/// Insert `,` between thousands in the integer part of a number string
pub fn group_thousands(text: &str) -> String {
    let (int_part, frac_part) = match text.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (text, None),
    };
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part),
    };

    let mut grouped = String::with_capacity(text.len() + digits.len() / 3);
    grouped.push_str(sign);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}

fn fixed(value: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, value)
}

/// Formats the value text and the min/max labels of one gauge
#[derive(Clone, Default)]
pub struct ValueFormatter {
    decimals: usize,
    symbol: String,
    human_friendly: bool,
    human_friendly_decimal: usize,
    format_number: bool,
    display_remaining: bool,
    max: f64,
    renderer: Option<TextRenderer>,
}

impl ValueFormatter {
    pub fn from_config(config: &GaugeConfig) -> Self {
        Self {
            decimals: config.decimals,
            symbol: config.symbol.clone(),
            human_friendly: config.human_friendly,
            human_friendly_decimal: config.human_friendly_decimal,
            format_number: config.format_number,
            display_remaining: config.display_remaining,
            max: config.max,
            renderer: None,
        }
    }

    pub fn set_max(&mut self, max: f64) {
        self.max = max;
    }

    pub fn set_decimals(&mut self, decimals: usize) {
        self.decimals = decimals;
    }

    pub fn set_symbol(&mut self, symbol: impl Into<String>) {
        self.symbol = symbol.into();
    }

    pub fn set_renderer(&mut self, renderer: Option<TextRenderer>) {
        self.renderer = renderer;
    }

    /// Text for the value readout
    pub fn format(&self, value: f64) -> String {
        if let Some(text) = self.renderer.as_ref().and_then(|render| render(value)) {
            return text;
        }

        let body = if self.human_friendly {
            human_friendly(value, self.human_friendly_decimal)
        } else if self.format_number {
            group_thousands(&fixed(value, self.decimals))
        } else if self.display_remaining {
            fixed(self.max - value, self.decimals)
        } else {
            fixed(value, self.decimals)
        };
        body + &self.symbol
    }

    /// Text for a min or max label. `explicit` wins when set.
    pub fn bound_text(&self, bound: f64, explicit: Option<&str>) -> String {
        match explicit {
            Some(text) if !text.is_empty() => text.to_string(),
            _ if self.human_friendly => human_friendly(bound, self.human_friendly_decimal),
            _ if self.format_number => group_thousands(&bound.to_string()),
            _ => bound.to_string(),
        }
    }
}

impl fmt::Debug for ValueFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueFormatter")
            .field("decimals", &self.decimals)
            .field("symbol", &self.symbol)
            .field("human_friendly", &self.human_friendly)
            .field("format_number", &self.format_number)
            .field("display_remaining", &self.display_remaining)
            .field("renderer", &self.renderer.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_friendly() {
        assert_eq!(human_friendly(1_234_567.0, 2), "1.23M");
        assert_eq!(human_friendly(999.0, 0), "999");
        assert_eq!(human_friendly(1500.0, 0), "2K");
        assert_eq!(human_friendly(-1500.0, 0), "-1K");
        assert_eq!(human_friendly(-0.2, 0), "0");
        assert_eq!(human_friendly(2.5e9, 1), "2.5G");
        // Suffixes run out at E
        assert_eq!(human_friendly(5e21, 0), "5000E");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("1234567.89"), "1,234,567.89");
        assert_eq!(group_thousands("-1234"), "-1,234");
        assert_eq!(group_thousands("123"), "123");
        assert_eq!(group_thousands("1000"), "1,000");
        assert_eq!(group_thousands("0.5"), "0.5");
    }

    #[test]
    fn test_priority_order() {
        let mut config = GaugeConfig {
            human_friendly: true,
            format_number: true,
            display_remaining: true,
            decimals: 1,
            symbol: "%".to_string(),
            ..GaugeConfig::default()
        };
        assert_eq!(ValueFormatter::from_config(&config).format(12_000.0), "12K%");

        config.human_friendly = false;
        assert_eq!(
            ValueFormatter::from_config(&config).format(12_000.0),
            "12,000.0%"
        );

        config.format_number = false;
        assert_eq!(ValueFormatter::from_config(&config).format(30.0), "70.0%");

        config.display_remaining = false;
        assert_eq!(ValueFormatter::from_config(&config).format(30.0), "30.0%");
    }

    #[test]
    fn test_decimals_and_symbol() {
        let config = GaugeConfig {
            decimals: 2,
            symbol: " km/h".to_string(),
            ..GaugeConfig::default()
        };
        let formatter = ValueFormatter::from_config(&config);
        assert_eq!(formatter.format(67.0), "67.00 km/h");
        assert_eq!(formatter.format(3.14159), "3.14 km/h");
    }

    #[test]
    fn test_bound_text() {
        let config = GaugeConfig {
            max: 25_000.0,
            ..GaugeConfig::default()
        };
        let mut formatter = ValueFormatter::from_config(&config);
        assert_eq!(formatter.bound_text(0.0, None), "0");
        assert_eq!(formatter.bound_text(25_000.0, Some("full")), "full");
        assert_eq!(formatter.bound_text(25_000.0, Some("")), "25000");

        formatter.format_number = true;
        assert_eq!(formatter.bound_text(25_000.0, None), "25,000");

        formatter.human_friendly = true;
        assert_eq!(formatter.bound_text(25_000.0, None), "25K");
    }

    #[test]
    fn test_renderer_overrides_and_falls_back() {
        let mut formatter = ValueFormatter::from_config(&GaugeConfig::default());
        formatter.set_renderer(Some(Rc::new(|v| {
            if v > 90.0 {
                Some("MAX".to_string())
            } else {
                None
            }
        })));
        assert_eq!(formatter.format(95.0), "MAX");
        assert_eq!(formatter.format(40.0), "40");
    }
}
