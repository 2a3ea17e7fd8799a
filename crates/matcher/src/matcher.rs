use pointfix_core::Point;

use crate::config::MatchConfig;
use crate::index::ReferenceSet;
use crate::model::{JoinedRecord, MatchedReference};

/// Left-join as-built points onto the reference set.
///
/// Returns exactly one record per as-built point, in input order. A point
/// with no reference within the configured search radius, or with a
/// non-finite position, yields an unmatched record.
pub fn match_points(
    as_built: &[Point],
    reference: &ReferenceSet,
    config: &MatchConfig,
) -> Vec<JoinedRecord> {
    let radius = config.search_radius();

    as_built
        .iter()
        .enumerate()
        .map(|(row, p)| {
            if !p.has_finite_position() {
                return JoinedRecord::unmatched(row, p.name.clone());
            }

            let reference = reference.closest(p.position(), radius).and_then(|c| {
                reference.get(c.index).map(|point| MatchedReference {
                    index: c.index,
                    point: point.clone(),
                    distance: c.distance,
                    ties: c.ties,
                })
            });

            JoinedRecord {
                row,
                asbuilt_name: p.name.clone(),
                reference,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(points: Vec<Point>) -> ReferenceSet {
        ReferenceSet::build(points).unwrap()
    }

    #[test]
    fn coincident_match_takes_reference_fields() {
        let set = reference(vec![Point::new("P1", 100.0, 200.0, 10.0, "A")]);
        let as_built = vec![Point::new("X1", 100.0, 200.0, 5.0, "Z")];
        let out = match_points(&as_built, &set, &MatchConfig::coincident());

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].asbuilt_name, "X1");
        let p = out[0].point().unwrap();
        assert_eq!(p.name, "P1");
        assert_eq!(p.easting, 100.0);
        assert_eq!(p.northing, 200.0);
        assert_eq!(p.elevation, 10.0);
        assert_eq!(p.code, "A");
    }

    #[test]
    fn no_coincident_point_is_unmatched() {
        let set = reference(vec![Point::new("P1", 0.0, 0.0, 0.0, "A")]);
        let as_built = vec![Point::new("X2", 50.0, 50.0, 1.0, "B")];
        let out = match_points(&as_built, &set, &MatchConfig::coincident());

        assert_eq!(out.len(), 1);
        assert!(!out[0].is_matched());
        assert!(out[0].point().is_none());
    }

    #[test]
    fn empty_reference_keeps_every_row() {
        let set = ReferenceSet::empty();
        let as_built = vec![
            Point::new("X1", 1.0, 1.0, 0.0, ""),
            Point::new("X2", 2.0, 2.0, 0.0, ""),
            Point::new("X3", 3.0, 3.0, 0.0, ""),
        ];
        let out = match_points(&as_built, &set, &MatchConfig::nearest(None));
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|r| !r.is_matched()));
        let rows: Vec<usize> = out.iter().map(|r| r.row).collect();
        assert_eq!(rows, vec![0, 1, 2]);
    }

    #[test]
    fn preserves_input_order_and_duplicates() {
        let set = reference(vec![
            Point::new("P1", 0.0, 0.0, 0.0, "A"),
            Point::new("P2", 10.0, 0.0, 0.0, "B"),
        ]);
        let as_built = vec![
            Point::new("S", 10.0, 0.0, 0.0, ""),
            Point::new("S", 0.0, 0.0, 0.0, ""),
            Point::new("S", 10.0, 0.0, 0.0, ""),
        ];
        let out = match_points(&as_built, &set, &MatchConfig::coincident());
        let names: Vec<&str> = out.iter().map(|r| r.point().unwrap().name.as_str()).collect();
        assert_eq!(names, vec!["P2", "P1", "P2"]);
    }

    #[test]
    fn duplicate_reference_first_loaded_wins() {
        let set = reference(vec![
            Point::new("FIRST", 5.0, 5.0, 1.0, "A"),
            Point::new("SECOND", 5.0, 5.0, 2.0, "B"),
        ]);
        let as_built = vec![Point::new("X", 5.0, 5.0, 0.0, "")];
        let first = match_points(&as_built, &set, &MatchConfig::coincident());
        let second = match_points(&as_built, &set, &MatchConfig::coincident());

        assert_eq!(first, second);
        let matched = first[0].reference.as_ref().unwrap();
        assert_eq!(matched.point.name, "FIRST");
        assert_eq!(matched.index, 0);
        assert_eq!(matched.ties, 1);
        assert!(first[0].is_ambiguous());
    }

    #[test]
    fn float_noise_still_coincident() {
        let set = reference(vec![Point::new("P1", 0.1 + 0.2, 715234.3, 0.0, "A")]);
        let as_built = vec![Point::new("X", 0.3, 715234.3, 0.0, "")];
        let out = match_points(&as_built, &set, &MatchConfig::coincident());
        assert!(out[0].is_matched());
    }

    #[test]
    fn nearest_respects_max_distance() {
        let set = reference(vec![Point::new("P1", 0.0, 0.0, 0.0, "A")]);
        let as_built = vec![
            Point::new("NEAR", 0.03, 0.04, 0.0, ""),
            Point::new("FAR", 3.0, 4.0, 0.0, ""),
        ];

        let bounded = match_points(&as_built, &set, &MatchConfig::nearest(Some(0.1)));
        assert!(bounded[0].is_matched());
        assert!((bounded[0].reference.as_ref().unwrap().distance - 0.05).abs() < 1e-12);
        assert!(!bounded[1].is_matched());

        let unbounded = match_points(&as_built, &set, &MatchConfig::nearest(None));
        assert!(unbounded.iter().all(|r| r.is_matched()));
    }

    #[test]
    fn non_finite_query_is_unmatched() {
        let set = reference(vec![Point::new("P1", 0.0, 0.0, 0.0, "A")]);
        let as_built = vec![Point::new("X", f64::NAN, 0.0, 0.0, "")];
        let out = match_points(&as_built, &set, &MatchConfig::nearest(None));
        assert!(!out[0].is_matched());
    }
}
