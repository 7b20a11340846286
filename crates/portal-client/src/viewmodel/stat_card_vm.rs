//! Stat Card ViewModel
//!
//! One dashboard tile: a headline number and its change against the
//! previous period.

#[derive(Debug, Clone, PartialEq)]
pub enum ValueFormat {
    Count,
    Currency { symbol: String },
    Percent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Flat,
}

#[derive(Debug, Clone)]
pub struct StatCardViewModel {
    pub title: String,
    pub current: f64,
    pub previous: Option<f64>,
    pub format: ValueFormat,
}

impl StatCardViewModel {
    pub fn new(title: impl Into<String>, current: f64, format: ValueFormat) -> Self {
        Self {
            title: title.into(),
            current,
            previous: None,
            format,
        }
    }

    pub fn with_previous(mut self, previous: f64) -> Self {
        self.previous = Some(previous);
        self
    }

    pub fn display_value(&self) -> String {
        match &self.format {
            ValueFormat::Count => group_thousands(&format!("{:.0}", self.current)),
            ValueFormat::Currency { symbol } => {
                let amount = group_thousands(&format!("{:.2}", self.current.abs()));
                if self.current < 0.0 {
                    format!("-{}{}", symbol, amount)
                } else {
                    format!("{}{}", symbol, amount)
                }
            }
            ValueFormat::Percent => format!("{:.1}%", self.current),
        }
    }

    /// Relative change in percent; `None` without a non-zero previous value.
    pub fn change_percent(&self) -> Option<f64> {
        match self.previous {
            Some(previous) if previous != 0.0 => {
                Some((self.current - previous) / previous.abs() * 100.0)
            }
            _ => None,
        }
    }

    /// e.g. `+12.5%`
    pub fn change_label(&self) -> Option<String> {
        self.change_percent().map(|change| format!("{:+.1}%", change))
    }

    pub fn trend(&self) -> Trend {
        match self.change_percent() {
            Some(change) if change > 0.0 => Trend::Up,
            Some(change) if change < 0.0 => Trend::Down,
            _ => Trend::Flat,
        }
    }
}

fn group_thousands(number: &str) -> String {
    let (sign, rest) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let (integer, fraction) = match rest.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (rest, None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match fraction {
        Some(fraction) => format!("{}{}.{}", sign, grouped, fraction),
        None => format!("{}{}", sign, grouped),
    }
}
