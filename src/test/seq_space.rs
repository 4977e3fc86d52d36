use crate::gbn::{ConfigError, SeqSpace};

#[test]
fn seq_space_rejects_ambiguous_configuration() {
    assert!(matches!(
        SeqSpace::new(7, 4),
        Err(ConfigError::SeqSpaceTooSmall { limit: 7, window: 4 })
    ));
    assert!(matches!(SeqSpace::new(8, 0), Err(ConfigError::ZeroWindow)));
    assert!(SeqSpace::new(8, 4).is_ok());
}

#[test]
fn advance_wraps_at_limit() {
    let s = SeqSpace::new(8, 4).expect("valid");
    assert_eq!(s.advance(0), 1);
    assert_eq!(s.advance(6), 7);
    assert_eq!(s.advance(7), 0);
}

#[test]
fn window_straddling_wraparound_point() {
    let s = SeqSpace::new(8, 4).expect("valid");
    let members: Vec<u32> = (0..8).filter(|&i| s.is_within_window(6, i)).collect();
    assert_eq!(members, vec![0, 1, 6, 7]);
    assert_eq!(s.describe_window(6), vec![6, 7, 0, 1]);

    // base + window lands exactly on the limit
    let members: Vec<u32> = (0..8).filter(|&i| s.is_within_window(4, i)).collect();
    assert_eq!(members, vec![4, 5, 6, 7]);
}

#[test]
fn window_has_exactly_window_size_members_for_every_base() {
    for (limit, window) in [(8, 4), (9, 4), (16, 8), (16, 3), (2, 1), (64, 32)] {
        let s = SeqSpace::new(limit, window).expect("valid");
        for base in 0..limit {
            let members: Vec<u32> = (0..limit).filter(|&i| s.is_within_window(base, i)).collect();
            assert_eq!(members.len() as u32, window, "limit={limit} window={window} base={base}");
            let mut expected = s.describe_window(base);
            expected.sort_unstable();
            assert_eq!(members, expected);
        }
    }
}

#[test]
fn values_outside_sequence_space_are_never_in_window() {
    let s = SeqSpace::new(8, 4).expect("valid");
    assert!(!s.is_within_window(6, 8));
    assert!(!s.is_within_window(6, 9));
    assert!(!s.is_within_window(0, u32::MAX));
}

#[test]
fn offset_counts_forward_modulo_limit() {
    let s = SeqSpace::new(8, 4).expect("valid");
    assert_eq!(s.offset(6, 1), 3);
    assert_eq!(s.offset(2, 2), 0);
    assert_eq!(s.offset(0, 7), 7);
}
