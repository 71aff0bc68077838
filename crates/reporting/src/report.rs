//! Structured report model.
//!
//! Lines carry a semantic [`LineTag`] instead of console colours; the
//! presentation layer decides how each tag looks.

use core::fmt;
use core::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::charts::{DEFAULT_BIN_COUNT, DEFAULT_MAX_BAR_WIDTH};

/// Default size of the "top customers" list.
pub const DEFAULT_TOP_CUSTOMERS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineTag {
    Heading,
    Text,
    /// Indented list entry.
    Item,
    Warning,
    /// Chart title.
    Caption,
    /// One row of a rendered chart.
    Chart,
    Blank,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportLine {
    pub tag: LineTag,
    pub text: String,
}

impl ReportLine {
    pub fn new(tag: LineTag, text: impl Into<String>) -> Self {
        Self {
            tag,
            text: text.into(),
        }
    }

    pub fn blank() -> Self {
        Self::new(LineTag::Blank, "")
    }
}

/// One statistics screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Product,
    Category,
    Order,
    Customer,
    Employee,
    Supplier,
}

impl Section {
    /// Every section, in the order the full report runs them.
    pub const ALL: [Section; 6] = [
        Section::Product,
        Section::Category,
        Section::Order,
        Section::Customer,
        Section::Employee,
        Section::Supplier,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Section::Product => "product",
            Section::Category => "category",
            Section::Order => "order",
            Section::Customer => "customer",
            Section::Employee => "employee",
            Section::Supplier => "supplier",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Section::Product => "Product Statistics",
            Section::Category => "Category Statistics",
            Section::Order => "Order Statistics",
            Section::Customer => "Customer Statistics",
            Section::Employee => "Employee Statistics",
            Section::Supplier => "Supplier Statistics",
        }
    }

    /// Position in the interactive menu (`1`..=`6`).
    pub fn menu_number(self) -> u8 {
        match self {
            Section::Product => 1,
            Section::Category => 2,
            Section::Order => 3,
            Section::Customer => 4,
            Section::Employee => 5,
            Section::Supplier => 6,
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "unknown statistics section {0:?} (expected all, product, category, order, customer, employee or supplier)"
)]
pub struct UnknownSection(pub String);

impl FromStr for Section {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "product" | "products" => Ok(Section::Product),
            "category" | "categories" => Ok(Section::Category),
            "order" | "orders" => Ok(Section::Order),
            "customer" | "customers" => Ok(Section::Customer),
            "employee" | "employees" => Ok(Section::Employee),
            "supplier" | "suppliers" => Ok(Section::Supplier),
            _ => Err(UnknownSection(s.to_string())),
        }
    }
}

/// Which sections a report run covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    All,
    One(Section),
}

impl Selection {
    pub fn sections(self) -> Vec<Section> {
        match self {
            Selection::All => Section::ALL.to_vec(),
            Selection::One(section) => vec![section],
        }
    }

    /// Interpret an interactive menu choice: `0` is everything, `1`..=`6` a
    /// single section.
    pub fn from_menu_choice(choice: &str) -> Option<Self> {
        let number: u8 = choice.trim().parse().ok()?;
        if number == 0 {
            return Some(Selection::All);
        }
        Section::ALL
            .into_iter()
            .find(|s| s.menu_number() == number)
            .map(Selection::One)
    }
}

impl FromStr for Selection {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Selection::All);
        }
        s.parse().map(Selection::One)
    }
}

/// Knobs for report layout and the clock used for tenure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    pub max_bar_width: usize,
    pub bin_count: usize,
    pub top_customers: usize,
    pub as_of: NaiveDate,
}

impl ReportOptions {
    pub fn new(as_of: NaiveDate) -> Self {
        Self {
            max_bar_width: DEFAULT_MAX_BAR_WIDTH,
            bin_count: DEFAULT_BIN_COUNT,
            top_customers: DEFAULT_TOP_CUSTOMERS,
            as_of,
        }
    }
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self::new(chrono::Local::now().date_naive())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSection {
    pub section: Section,
    pub lines: Vec<ReportLine>,
}

impl ReportSection {
    /// A section opened with its `[Title]` heading.
    pub fn new(section: Section) -> Self {
        Self {
            section,
            lines: vec![ReportLine::new(
                LineTag::Heading,
                format!("[{}]", section.title()),
            )],
        }
    }

    pub fn push(&mut self, tag: LineTag, text: impl Into<String>) {
        self.lines.push(ReportLine::new(tag, text));
    }

    pub fn text(&mut self, text: impl Into<String>) {
        self.push(LineTag::Text, text);
    }

    pub fn item(&mut self, text: impl fmt::Display) {
        self.push(LineTag::Item, format!("  {text}"));
    }

    pub fn warning(&mut self, text: impl Into<String>) {
        self.push(LineTag::Warning, text);
    }

    /// Append a captioned chart after a blank line. A chart with no rows is
    /// left out entirely, caption included.
    pub fn chart(&mut self, caption: impl Into<String>, rows: Vec<String>) {
        if rows.is_empty() {
            return;
        }
        self.lines.push(ReportLine::blank());
        self.push(LineTag::Caption, caption);
        self.lines
            .extend(rows.into_iter().map(|row| ReportLine::new(LineTag::Chart, row)));
    }

    pub fn to_text(&self) -> String {
        render_text(self.lines.iter())
    }
}

fn render_text<'a>(lines: impl Iterator<Item = &'a ReportLine>) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(&line.text);
        out.push('\n');
    }
    out
}

/// Sections in run order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Report {
    pub sections: Vec<ReportSection>,
}

impl Report {
    /// Every line of the report with a blank line between sections.
    pub fn lines(&self) -> Vec<&ReportLine> {
        let mut out = Vec::new();
        for (i, section) in self.sections.iter().enumerate() {
            if i > 0 {
                out.push(&BLANK_LINE);
            }
            out.extend(section.lines.iter());
        }
        out
    }

    pub fn to_text(&self) -> String {
        render_text(self.lines().into_iter())
    }
}

static BLANK_LINE: ReportLine = ReportLine {
    tag: LineTag::Blank,
    text: String::new(),
};
