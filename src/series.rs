use plotters::style::RGBColor;

use crate::data_loader::{DataRow, Dataset};

// qualitative "Accent" scheme
pub const ACCENT: [RGBColor; 8] = [
    RGBColor(0x7f, 0xc9, 0x7f),
    RGBColor(0xbe, 0xae, 0xd4),
    RGBColor(0xfd, 0xc0, 0x86),
    RGBColor(0xff, 0xff, 0x99),
    RGBColor(0x38, 0x6c, 0xb0),
    RGBColor(0xf0, 0x02, 0x7f),
    RGBColor(0xbf, 0x5b, 0x17),
    RGBColor(0x66, 0x66, 0x66),
];

/// Distinct sweep values of a dataset in order of first appearance.
/// Equality is exact on the parsed `f64`.
pub fn distinct_values(dataset: &Dataset) -> Vec<f64> {
    let mut values: Vec<f64> = Vec::new();
    for row in &dataset.rows {
        if !values.contains(&row.sweep_value) {
            values.push(row.sweep_value);
        }
    }
    values
}

/// Colors keyed by sweep value, assigned by first-seen index modulo the palette.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorAssignment {
    values: Vec<f64>,
}

impl ColorAssignment {
    pub fn new(values: Vec<f64>) -> Self {
        ColorAssignment { values }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn index_of(&self, value: f64) -> Option<usize> {
        self.values.iter().position(|v| *v == value)
    }

    pub fn color_at(index: usize) -> RGBColor {
        ACCENT[index % ACCENT.len()]
    }

    pub fn color_of(&self, value: f64) -> Option<RGBColor> {
        self.index_of(value).map(Self::color_at)
    }
}

/// Rows sharing one sweep value, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesGroup {
    pub index: usize,
    pub sweep_value: f64,
    pub color: RGBColor,
    pub rows: Vec<DataRow>,
}

pub fn group_series(dataset: &Dataset, colors: &ColorAssignment) -> Vec<SeriesGroup> {
    colors
        .values()
        .iter()
        .enumerate()
        .map(|(index, &sweep_value)| SeriesGroup {
            index,
            sweep_value,
            color: ColorAssignment::color_at(index),
            rows: dataset
                .rows
                .iter()
                .filter(|row| row.sweep_value == sweep_value)
                .copied()
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn row(sweep_value: f64, step_index: i64, gradient_norm: f64) -> DataRow {
        DataRow { sweep_value, gradient_norm, step_index }
    }

    #[test]
    fn groups_by_first_seen_value() {
        let dataset = Dataset::new(
            "c1",
            vec![row(0.1, 0, 5.0), row(0.1, 1, 3.0), row(0.2, 0, 5.0)],
        );
        let colors = ColorAssignment::new(distinct_values(&dataset));
        let groups = group_series(&dataset, &colors);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].sweep_value, 0.1);
        assert_eq!(groups[0].rows, vec![row(0.1, 0, 5.0), row(0.1, 1, 3.0)]);
        assert_eq!(groups[1].sweep_value, 0.2);
        assert_eq!(groups[1].rows.len(), 1);
        assert_ne!(groups[0].color, groups[1].color);
        assert_eq!(colors.color_of(0.2), Some(ACCENT[1]));
    }

    #[test]
    fn interleaved_rows_keep_file_order() {
        let dataset = Dataset::new(
            "c2",
            vec![row(0.9, 0, 4.0), row(0.7, 0, 6.0), row(0.9, 1, 2.0), row(0.7, 1, 3.0)],
        );
        let values = distinct_values(&dataset);
        assert_eq!(values, vec![0.9, 0.7]);

        let groups = group_series(&dataset, &ColorAssignment::new(values));
        let steps: Vec<i64> = groups[1].rows.iter().map(|r| r.step_index).collect();
        assert_eq!(steps, vec![0, 1]);
    }

    #[test]
    fn palette_wraps_after_eight() {
        let values: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let colors = ColorAssignment::new(values);
        assert_eq!(colors.color_of(8.0), Some(ACCENT[0]));
        assert_eq!(colors.color_of(9.0), Some(ACCENT[1]));
        assert_eq!(colors.color_of(42.0), None);
    }

    #[test]
    fn equal_parsed_values_collide() {
        let dataset = Dataset::new("c1", vec![row(1.0, 0, 1.0), row("1".parse().unwrap(), 1, 1.0)]);
        assert_eq!(distinct_values(&dataset).len(), 1);
    }

    proptest! {
        #[test]
        fn one_color_per_distinct_value(raw in prop::collection::vec(0u8..8, 0..64)) {
            let rows: Vec<DataRow> = raw
                .iter()
                .enumerate()
                .map(|(i, v)| row(*v as f64 / 10.0, i as i64, 1.0))
                .collect();
            let dataset = Dataset::new("c1", rows);
            let values = distinct_values(&dataset);
            let groups = group_series(&dataset, &ColorAssignment::new(values.clone()));

            let mut colors: Vec<RGBColor> = groups.iter().map(|g| g.color).collect();
            colors.dedup();
            prop_assert_eq!(colors.len(), values.len());
            prop_assert_eq!(groups.iter().map(|g| g.rows.len()).sum::<usize>(), dataset.len());
        }
    }
}
