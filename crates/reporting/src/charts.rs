//! Fixed-width text charts.
//!
//! Both renderers are pure: they return the chart rows and leave printing to
//! the caller. Bar lengths are `floor(value / max × width)` computed in integer
//! arithmetic, with a zero maximum producing empty bars.

pub const BAR_GLYPH: char = '█';
pub const DEFAULT_MAX_BAR_WIDTH: usize = 40;
pub const DEFAULT_BIN_COUNT: usize = 10;

fn bar_length(value: u64, max: u64, max_bar_width: usize) -> usize {
    if max == 0 {
        return 0;
    }
    let scaled = u128::from(value) * max_bar_width as u128 / u128::from(max);
    scaled as usize
}

fn bar(length: usize) -> String {
    std::iter::repeat_n(BAR_GLYPH, length).collect()
}

/// Render one `"{label} | {bar} {count}"` row per entry, in input order.
///
/// Labels are padded to the widest label so the bars line up.
pub fn bar_chart<L: AsRef<str>>(data: &[(L, u64)], max_bar_width: usize) -> Vec<String> {
    let Some(max_value) = data.iter().map(|(_, count)| *count).max() else {
        return Vec::new();
    };
    let label_width = data
        .iter()
        .map(|(label, _)| label.as_ref().chars().count())
        .max()
        .unwrap_or(0);

    data.iter()
        .map(|(label, count)| {
            let length = bar_length(*count, max_value, max_bar_width);
            format!(
                "{label:<label_width$} | {bar} {count}",
                label = label.as_ref(),
                bar = bar(length),
            )
        })
        .collect()
}

/// Equal-width binning of integer values.
///
/// The value range is `[min, max]`, widened to `[min, min + 1]` when every
/// value is the same. A value whose bin index reaches `bin_count` (the top
/// edge) is counted in the last bin.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    min: i64,
    bin_size: f64,
    counts: Vec<u64>,
}

impl Histogram {
    /// `None` for empty input or zero bins.
    pub fn from_values(values: &[i64], bin_count: usize) -> Option<Self> {
        if bin_count == 0 {
            return None;
        }
        let min = *values.iter().min()?;
        let mut max = i128::from(*values.iter().max()?);
        if i128::from(min) == max {
            max += 1;
        }

        let bin_size = (max - i128::from(min)) as f64 / bin_count as f64;
        let mut counts = vec![0u64; bin_count];
        for &value in values {
            let offset = (i128::from(value) - i128::from(min)) as f64;
            let index = ((offset / bin_size).floor() as usize).min(bin_count - 1);
            counts[index] += 1;
        }

        Some(Self {
            min,
            bin_size,
            counts,
        })
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn bin_size(&self) -> f64 {
        self.bin_size
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Start and end of bin `index`, truncated toward zero.
    pub fn bin_edges(&self, index: usize) -> (i64, i64) {
        let start = self.min as f64 + index as f64 * self.bin_size;
        let end = self.min as f64 + (index + 1) as f64 * self.bin_size;
        (start as i64, end as i64)
    }

    /// One `"{start:>5}-{end:>5} | {bar} {count}"` row per bin, scaled
    /// against the busiest bin.
    pub fn render(&self, max_bar_width: usize) -> Vec<String> {
        let busiest = self.counts.iter().copied().max().unwrap_or(0);

        self.counts
            .iter()
            .enumerate()
            .map(|(index, &count)| {
                let (start, end) = self.bin_edges(index);
                let length = bar_length(count, busiest, max_bar_width);
                format!("{start:>5}-{end:>5} | {} {count}", bar(length))
            })
            .collect()
    }
}

/// Bin `values` and render the histogram; empty input renders nothing.
pub fn histogram(values: &[i64], bin_count: usize, max_bar_width: usize) -> Vec<String> {
    Histogram::from_values(values, bin_count)
        .map(|h| h.render(max_bar_width))
        .unwrap_or_default()
}
