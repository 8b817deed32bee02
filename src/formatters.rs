use crate::models::{CardKind, MetricCard};
use anyhow::Result;
use colored::Colorize;
use prettytable::{format, Cell, Row, Table};

/// How a card value is turned into text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberFormat {
    /// Floored to an integer, with thousands separators
    Grouped,
    /// Fixed number of decimal places
    Fixed(usize),
}

impl NumberFormat {
    pub fn for_primary(_kind: CardKind) -> Self {
        NumberFormat::Grouped
    }

    pub fn for_secondary(kind: CardKind) -> Self {
        match kind {
            CardKind::Coin => NumberFormat::Fixed(2),
            CardKind::City => NumberFormat::Grouped,
        }
    }

    pub fn apply(self, value: f64) -> String {
        match self {
            NumberFormat::Grouped => format_grouped(value),
            NumberFormat::Fixed(places) => format!("{:.*}", places, value),
        }
    }
}

/// Direction of a signed figure, drives the color of the change text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Neutral,
    Positive,
    Negative,
}

impl Tone {
    pub fn of_change(value: f64) -> Self {
        if value >= 0.0 {
            Tone::Positive
        } else {
            Tone::Negative
        }
    }

    pub fn for_secondary(kind: CardKind, value: f64) -> Self {
        match kind {
            CardKind::Coin => Tone::of_change(value),
            CardKind::City => Tone::Neutral,
        }
    }
}

/// Floor and group by thousands: 50000.9 -> "50,000", -3.2 -> "-4"
pub fn format_grouped(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    let floored = value.floor() as i64;
    let digits = floored.unsigned_abs().to_string();
    let mut result = String::new();

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }

    if floored < 0 {
        result.insert(0, '-');
    }
    result
}

/// Final text for a card, as shown once animations settle. Units are kept
/// apart from the figures, the same way the card draws them.
#[derive(Debug, Clone, PartialEq)]
pub struct CardText {
    pub label: String,
    pub primary_caption: &'static str,
    pub primary: String,
    pub primary_unit: Option<&'static str>,
    pub secondary_caption: &'static str,
    pub secondary: Option<String>,
    pub secondary_unit: Option<String>,
    pub tone: Tone,
}

impl CardText {
    pub fn primary_with_unit(&self) -> String {
        with_unit(&self.primary, self.primary_unit)
    }

    pub fn secondary_with_unit(&self) -> String {
        match &self.secondary {
            Some(text) => with_unit(text, self.secondary_unit.as_deref()),
            None => "-".to_string(),
        }
    }
}

impl From<&MetricCard> for CardText {
    fn from(card: &MetricCard) -> Self {
        let tone = card
            .secondary_value
            .map(|value| Tone::for_secondary(card.kind, value))
            .unwrap_or(Tone::Neutral);

        Self {
            label: card.label.clone(),
            primary_caption: card.kind.primary_caption(),
            primary: NumberFormat::for_primary(card.kind).apply(card.primary_value),
            primary_unit: card.kind.primary_unit(),
            secondary_caption: card.kind.secondary_caption(),
            secondary: card
                .secondary_value
                .map(|value| NumberFormat::for_secondary(card.kind).apply(value)),
            secondary_unit: card.secondary_unit.clone(),
            tone,
        }
    }
}

pub fn with_unit(text: &str, unit: Option<&str>) -> String {
    match unit {
        Some("%") => format!("{}%", text),
        Some(unit) => format!("{} {}", text, unit),
        None => text.to_string(),
    }
}

pub fn format_table(cards: &[MetricCard]) -> String {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);

    let Some(first) = cards.first() else {
        return String::new();
    };
    table.set_titles(Row::new(vec![
        Cell::new("Name").style_spec("bFc"),
        Cell::new(first.kind.primary_caption()).style_spec("bFc"),
        Cell::new(first.kind.secondary_caption()).style_spec("bFc"),
    ]));

    for card in cards {
        let text = CardText::from(card);
        let secondary_style = match text.tone {
            Tone::Positive => "Fg",
            Tone::Negative => "Fr",
            Tone::Neutral => "",
        };
        table.add_row(Row::new(vec![
            Cell::new(&text.label),
            Cell::new(&text.primary_with_unit()),
            Cell::new(&text.secondary_with_unit()).style_spec(secondary_style),
        ]));
    }

    table.to_string()
}

pub fn format_csv(cards: &[MetricCard]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["label", "primary", "secondary", "secondary_unit"])?;

    for card in cards {
        writer.write_record([
            card.label.clone(),
            card.primary_value.to_string(),
            card.secondary_value.map(|v| v.to_string()).unwrap_or_default(),
            card.secondary_unit.clone().unwrap_or_default(),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

pub fn format_json(cards: &[MetricCard]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(cards)
}

pub fn format_markdown(cards: &[MetricCard]) -> String {
    let mut md = String::new();
    let Some(first) = cards.first() else {
        return md;
    };

    md.push_str(&format!(
        "| Name | {} | {} |\n",
        first.kind.primary_caption(),
        first.kind.secondary_caption()
    ));
    md.push_str("|------|------|------|\n");

    for card in cards {
        let text = CardText::from(card);
        md.push_str(&format!(
            "| {} | {} | {} |\n",
            text.label,
            text.primary_with_unit(),
            text.secondary_with_unit()
        ));
    }

    md
}

/// Short colored summary printed after the one-shot table
pub fn print_summary(cards: &[MetricCard]) {
    println!("\n{}", "=== Summary ===".bright_cyan().bold());
    for card in cards {
        let text = CardText::from(card);
        let secondary = text.secondary_with_unit();
        let secondary = match text.tone {
            Tone::Positive => secondary.green(),
            Tone::Negative => secondary.red(),
            Tone::Neutral => secondary.normal(),
        };
        println!(
            "  {}: {} | {}",
            text.label.bright_blue(),
            text.primary_with_unit().bold(),
            secondary
        );
    }
}
