// Unit tests for business rules

use super::*;

fn clip(source_id: &str, n: u32) -> Clip {
    let source = SourceVideo::new(source_id, format!("{}.mp4", source_id), 600.0).unwrap();
    Clip::new(&source, n, n as f64 * 2.0).unwrap()
}

/// `per_source` clips for each label, grouped by source
fn grouped_pool(labels: &[&str], per_source: u32) -> Vec<Clip> {
    labels
        .iter()
        .flat_map(|l| (1..=per_source).map(move |n| clip(l, n)))
        .collect()
}

fn ids(clips: &[Clip]) -> Vec<&str> {
    clips.iter().map(|c| c.id.as_str()).collect()
}

fn sorted_ids(clips: &[Clip]) -> Vec<String> {
    let mut v: Vec<String> = clips.iter().map(|c| c.id.clone()).collect();
    v.sort();
    v
}

#[test]
fn test_shuffle_empty() {
    assert!(ClipSequencer::shuffle(&[]).is_empty());
}

#[test]
fn test_shuffle_alternates_two_sources() {
    let pool = grouped_pool(&["a", "b"], 3);
    let shuffled = ClipSequencer::shuffle(&pool);

    assert_eq!(ids(&shuffled), vec!["a1", "b1", "a2", "b2", "a3", "b3"]);
    assert!(ClipSequencer::is_valid_sequence(&shuffled));
}

#[test]
fn test_shuffle_is_permutation() {
    for labels in [&["a", "b"][..], &["a", "b", "c"][..], &["a", "b", "c", "d", "e"][..]] {
        for per_source in 1..=6 {
            let pool = grouped_pool(labels, per_source);
            let shuffled = ClipSequencer::shuffle(&pool);
            assert_eq!(shuffled.len(), pool.len());
            assert_eq!(sorted_ids(&shuffled), sorted_ids(&pool));
        }
    }
}

#[test]
fn test_shuffle_adjacency_for_balanced_pools() {
    for labels in [&["a", "b"][..], &["a", "b", "c"][..], &["a", "b", "c", "d"][..], &["a", "b", "c", "d", "e"][..]] {
        for per_source in 1..=7 {
            let pool = grouped_pool(labels, per_source);
            let shuffled = ClipSequencer::shuffle(&pool);
            assert!(
                ClipSequencer::is_valid_sequence(&shuffled),
                "adjacent repeat for {:?} x{}: {:?}",
                labels,
                per_source,
                ids(&shuffled)
            );
        }
    }
}

#[test]
fn test_shuffle_adjacency_with_interleaved_input() {
    let pool: Vec<Clip> = (1..=4)
        .flat_map(|n| ["c", "a", "b"].into_iter().map(move |l| clip(l, n)))
        .collect();
    let shuffled = ClipSequencer::shuffle(&pool);

    assert!(ClipSequencer::is_valid_sequence(&shuffled));
    assert_eq!(shuffled[0].id, "c1");
}

#[test]
fn test_shuffle_adjacency_with_tapering_sources() {
    let mut pool = grouped_pool(&["a"], 8);
    pool.extend(grouped_pool(&["b"], 7));
    pool.extend(grouped_pool(&["c"], 6));

    let shuffled = ClipSequencer::shuffle(&pool);
    assert!(ClipSequencer::is_valid_sequence(&shuffled));
}

#[test]
fn test_shuffle_single_source_keeps_order() {
    let pool = grouped_pool(&["a"], 4);
    let shuffled = ClipSequencer::shuffle(&pool);
    assert_eq!(shuffled, pool);
}

#[test]
fn test_shuffle_dominant_source_falls_back() {
    let mut pool = grouped_pool(&["a"], 3);
    pool.push(clip("b", 1));

    let shuffled = ClipSequencer::shuffle(&pool);
    assert_eq!(ids(&shuffled), vec!["a1", "b1", "a2", "a3"]);
    assert!(!ClipSequencer::is_valid_sequence(&shuffled));
}

#[test]
fn test_shuffle_is_deterministic() {
    let pool = grouped_pool(&["a", "b", "c"], 5);
    assert_eq!(ClipSequencer::shuffle(&pool), ClipSequencer::shuffle(&pool));
}

#[test]
fn test_shuffle_does_not_touch_input() {
    let pool = grouped_pool(&["a", "b"], 2);
    let before = pool.clone();
    let _ = ClipSequencer::shuffle(&pool);
    assert_eq!(pool, before);
}

#[test]
fn test_is_valid_sequence() {
    assert!(ClipSequencer::is_valid_sequence(&[]));
    assert!(ClipSequencer::is_valid_sequence(&[clip("a", 1)]));
    assert!(ClipSequencer::is_valid_sequence(&[clip("a", 1), clip("b", 1), clip("a", 2)]));
    assert!(!ClipSequencer::is_valid_sequence(&[clip("a", 1), clip("a", 2), clip("b", 1)]));
}

#[test]
fn test_clips_needed() {
    assert_eq!(GenerationRules::clips_needed(TargetDuration::Seconds15), 10);
    assert_eq!(GenerationRules::clips_needed(TargetDuration::Seconds30), 20);
    assert_eq!(GenerationRules::clips_needed(TargetDuration::Seconds45), 30);
    assert_eq!(GenerationRules::clips_needed(TargetDuration::Seconds60), 40);
}

#[test]
fn test_preconditions_single_source() {
    let pool = grouped_pool(&["a"], 12);
    let settings = GenerationSettings::new(TargetDuration::Seconds15, 1, OutputFormat::Mp4).unwrap();

    assert_eq!(
        GenerationRules::check_preconditions(&pool, &settings),
        Err(DomainError::InsufficientSources { found: 1 })
    );
}

#[test]
fn test_preconditions_too_few_clips() {
    let mut pool = grouped_pool(&["a"], 3);
    pool.extend(grouped_pool(&["b"], 2));
    let settings = GenerationSettings::new(TargetDuration::Seconds30, 1, OutputFormat::Mp4).unwrap();

    let err = GenerationRules::check_preconditions(&pool, &settings).unwrap_err();
    assert_eq!(
        err,
        DomainError::InsufficientClips {
            required: 20,
            available: 5
        }
    );
    assert_eq!(err.shortfall(), Some(15));
    assert!(err.is_rejection());
}

#[test]
fn test_preconditions_reject_out_of_range_count() {
    let pool = grouped_pool(&["a", "b"], 10);

    for count in [0, MAX_OUTPUT_COUNT + 1, 500] {
        let settings = GenerationSettings {
            count,
            ..GenerationSettings::default()
        };
        let err = GenerationRules::check_preconditions(&pool, &settings).unwrap_err();
        assert!(matches!(err, DomainError::BadArgs(_)));
        assert!(!err.is_rejection());
    }

    let settings = GenerationSettings {
        target_duration: TargetDuration::Seconds15,
        count: MAX_OUTPUT_COUNT,
        format: OutputFormat::Mp4,
    };
    assert!(GenerationRules::check_preconditions(&pool, &settings).is_ok());
}

#[test]
fn test_preconditions_pass() {
    let pool = grouped_pool(&["a", "b"], 5);
    let settings = GenerationSettings::new(TargetDuration::Seconds15, 2, OutputFormat::Webm).unwrap();
    assert!(GenerationRules::check_preconditions(&pool, &settings).is_ok());
}

#[test]
fn test_select_for_output_truncates() {
    let pool = grouped_pool(&["a", "b"], 8);
    let shuffled = ClipSequencer::shuffle(&pool);
    let selected = GenerationRules::select_for_output(&shuffled, TargetDuration::Seconds15);

    assert_eq!(selected.len(), 10);
    assert_eq!(selected[..], shuffled[..10]);
    assert_eq!(GenerationRules::total_duration(&selected), 15.0);
}

#[test]
fn test_validate_clip_against_sources() {
    let short = SourceVideo::new("a", "a.mp4", 2.0).unwrap();
    let sources = vec![short];

    let fits = Clip {
        id: "a1".to_string(),
        source_id: "a".to_string(),
        start_time: 0.5,
        end_time: 2.0,
        duration: CLIP_DURATION,
        color: source_color("a").to_string(),
    };
    assert_eq!(GenerationRules::validate_clip(&fits, &sources).unwrap().id, "a");

    let overflow = Clip {
        start_time: 1.0,
        end_time: 2.5,
        ..fits.clone()
    };
    let err = GenerationRules::validate_clip(&overflow, &sources).unwrap_err();
    assert_eq!(err.stage, EncodeStage::Validate);

    let orphan = Clip {
        source_id: "z".to_string(),
        ..fits
    };
    assert!(GenerationRules::validate_clip(&orphan, &sources).is_err());
}

#[test]
fn test_output_filename() {
    let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
    assert_eq!(
        OutputNaming::filename(0, 15.0, date, OutputFormat::Mp4),
        "shorts_01_15s_20240307.mp4"
    );
    assert_eq!(
        OutputNaming::filename(9, 45.0, date, OutputFormat::Webm),
        "shorts_10_45s_20240307.webm"
    );
    assert_eq!(OutputNaming::output_id(2), "gen_3");
}
