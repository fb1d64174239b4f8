//! Property tests for the reader and derived series.

use hx_series::{TimeSeries, diff_series, parse_last_value, parse_series};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Line {
    Row(f64, f64),
    Comment(String),
    Blank,
    Junk(String),
}

fn line() -> impl Strategy<Value = Line> {
    prop_oneof![
        4 => (-1.0e6f64..1.0e6, -1.0e6f64..1.0e6).prop_map(|(t, v)| Line::Row(t, v)),
        1 => "[ a-zA-Z:()]{0,20}".prop_map(|s| Line::Comment(format!("#{s}"))),
        1 => Just(Line::Blank),
        1 => "[/()xyz]{1,8}".prop_map(Line::Junk),
    ]
}

fn render(lines: &[Line]) -> String {
    let mut text = String::new();
    for line in lines {
        match line {
            Line::Row(t, v) => text.push_str(&format!("{t}\t{v}\n")),
            Line::Comment(c) => text.push_str(&format!("{c}\n")),
            Line::Blank => text.push_str("   \n"),
            Line::Junk(j) => text.push_str(&format!("{j} {j}\n")),
        }
    }
    text
}

proptest! {
    #[test]
    fn reader_keeps_exactly_the_data_rows(lines in prop::collection::vec(line(), 0..40)) {
        let text = render(&lines);
        let series = parse_series(text.as_bytes()).unwrap();
        let rows: Vec<(f64, f64)> = lines
            .iter()
            .filter_map(|l| match l {
                Line::Row(t, v) => Some((*t, *v)),
                _ => None,
            })
            .collect();

        prop_assert_eq!(series.len(), rows.len());
        for ((t, v), (et, ev)) in series.points().zip(rows.iter()) {
            prop_assert_eq!(t, *et);
            prop_assert_eq!(v, *ev);
        }
        prop_assert_eq!(parse_last_value(text.as_bytes()).unwrap(), rows.last().map(|r| r.1));
    }

    #[test]
    fn diff_keeps_reference_grid(
        a in prop::collection::vec((0.0f64..100.0, -50.0f64..50.0), 2..30),
        b in prop::collection::vec((0.0f64..100.0, -50.0f64..50.0), 2..30),
    ) {
        let mut b = b;
        b.sort_by(|x, y| x.0.total_cmp(&y.0));
        let a = TimeSeries::from_points(a);
        let b = TimeSeries::from_points(b);
        let d = diff_series(Some(&a), Some(&b)).unwrap();
        prop_assert_eq!(d.len(), a.len());
        prop_assert_eq!(d.times(), a.times());
    }

    #[test]
    fn self_difference_is_zero(pts in prop::collection::vec((0.0f64..100.0, -50.0f64..50.0), 2..30)) {
        let mut pts = pts;
        pts.sort_by(|x, y| x.0.total_cmp(&y.0));
        pts.dedup_by(|x, y| x.0 == y.0);
        prop_assume!(pts.len() >= 2);
        let s = TimeSeries::from_points(pts);
        let d = diff_series(Some(&s), Some(&s)).unwrap();
        for v in d.values() {
            prop_assert!(v.abs() <= 1e-9);
        }
    }
}
