mod common;

use dna_contest::sequence::complement;
use dna_contest::strand::generate_strand;
use dna_contest::{ComplementError, ContestConfig, ParallelExecutor};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn test_acgt() {
    for contender in common::setup_contenders().unwrap() {
        assert_eq!(contender.convert(Some("ACGT")).unwrap(), "TGCA", "{}", contender.describe());
    }
}

#[test]
fn test_million_adenines() {
    let input = "A".repeat(1_000_000);
    let expected = "T".repeat(1_000_000);
    let results: Vec<String> = common::setup_contenders()
        .unwrap()
        .iter()
        .map(|c| c.convert(Some(input.as_str())).unwrap())
        .collect();
    assert_eq!(results.len(), 3);
    for result in &results {
        assert_eq!(result, &expected);
    }
}

#[test]
fn test_random_strand_complemented() {
    let mut rng = StdRng::seed_from_u64(2018);
    // not a multiple of the chunk count
    let input = generate_strand(&mut rng, 123_457);
    let expected: String = input
        .bytes()
        .map(|c| complement(c).unwrap() as char)
        .collect();
    for contender in common::setup_contenders().unwrap() {
        let result = contender.convert(Some(input.as_str())).unwrap();
        assert_eq!(result.len(), input.len());
        assert_eq!(result, expected, "{}", contender.describe());
    }
}

#[test]
fn test_involution() {
    let mut rng = StdRng::seed_from_u64(5);
    let input = generate_strand(&mut rng, 50_001);
    for contender in common::setup_contenders().unwrap() {
        let once = contender.convert(Some(input.as_str())).unwrap();
        let twice = contender.convert(Some(once.as_str())).unwrap();
        assert_eq!(twice, input);
    }
}

#[test]
fn test_failures() {
    for contender in common::setup_contenders().unwrap() {
        assert!(matches!(
            contender.convert(Some("ACGX")),
            Err(ComplementError::InvalidSymbol { symbol: 'X', .. })
        ));
        assert_eq!(contender.convert(None), Err(ComplementError::MissingInput));
        assert!(matches!(
            contender.convert(Some("acgt")),
            Err(ComplementError::InvalidSymbol { .. })
        ));
    }
}

#[test]
fn test_invalid_deep_in_strand() {
    let mut input = "G".repeat(300_000);
    input.replace_range(250_000..250_001, "N");
    for contender in common::setup_contenders().unwrap() {
        assert_eq!(
            contender.convert(Some(input.as_str())),
            Err(ComplementError::InvalidSymbol {
                symbol: 'N',
                position: Some(250_000)
            })
        );
    }
}

#[test]
fn test_shared_executor_is_reused() {
    let config = ContestConfig {
        threads: 2,
        ..Default::default()
    };
    let first = ParallelExecutor::shared(&config).unwrap();
    let second = ParallelExecutor::shared(&ContestConfig::default()).unwrap();
    assert!(std::sync::Arc::ptr_eq(&first, &second));
    assert_eq!(second.threads(), 2);
}
