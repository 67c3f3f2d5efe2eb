use edit_kernel::intervals::{
    Interval, Intervals, IntervalsIterator, backward_comparator, forward_comparator, from_list,
    merge,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layer {
    Syntax,
    Selection,
    Fold,
}

fn random_stream(rng: &mut StdRng, first_id: u64, layer: Layer) -> Vec<Interval<Layer>> {
    let mut intervals: Vec<Interval<Layer>> = (0..rng.gen_range(0..20))
        .map(|i| {
            let from = rng.gen_range(0..100);
            let to = from + rng.gen_range(0..10);
            Interval::new(first_id + i, from, to, layer)
        })
        .collect();
    intervals.sort_by_key(|interval| interval.from);
    intervals
}

#[test]
fn test_merged_stream_is_sorted_union() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..200 {
        let syntax = random_stream(&mut rng, 0, Layer::Syntax);
        let selection = random_stream(&mut rng, 1_000, Layer::Selection);

        let merged: Vec<Interval<Layer>> =
            Intervals::new(merge(from_list(&syntax), from_list(&selection), forward_comparator))
                .collect();

        assert_eq!(merged.len(), syntax.len() + selection.len());
        assert!(merged.windows(2).all(|w| w[0].from <= w[1].from));

        // Each source keeps its relative order.
        let syntax_ids: Vec<u64> = merged
            .iter()
            .filter(|i| i.data == Layer::Syntax)
            .map(|i| i.id)
            .collect();
        assert_eq!(syntax_ids, syntax.iter().map(|i| i.id).collect::<Vec<_>>());

        // Ties go to the left stream.
        for w in merged.windows(2) {
            if w[0].from == w[1].from && w[0].data != w[1].data {
                assert_eq!(w[0].data, Layer::Syntax);
            }
        }
    }
}

#[test]
fn test_backward_merge_of_three_layers() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut streams: Vec<Vec<Interval<Layer>>> = [Layer::Syntax, Layer::Selection, Layer::Fold]
        .into_iter()
        .enumerate()
        .map(|(i, layer)| random_stream(&mut rng, i as u64 * 100, layer))
        .collect();
    for stream in &mut streams {
        stream.reverse();
    }

    let two = merge(from_list(&streams[0]), from_list(&streams[1]), backward_comparator);
    let mut all = merge(two, from_list(&streams[2]), backward_comparator);

    let mut froms = Vec::new();
    while all.next() {
        froms.push(all.from());
        assert!(all.closed_left());
        assert!(!all.closed_right());
    }
    assert_eq!(froms.len(), streams.iter().map(Vec::len).sum::<usize>());
    assert!(froms.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn test_overlap_query_without_materializing() {
    // Which markers overlap the edit range [4, 6)?
    let folds = vec![
        Interval::new(1, 0, 2, Layer::Fold),
        Interval::new(2, 3, 5, Layer::Fold),
    ];
    let highlights = vec![
        Interval::new(3, 5, 9, Layer::Selection),
        Interval::new(4, 6, 7, Layer::Selection),
    ];

    let mut it = merge(from_list(&folds), from_list(&highlights), forward_comparator);
    let mut hits = Vec::new();
    while it.next() {
        if it.from() >= 6 {
            break;
        }
        if it.to() > 4 {
            hits.push((it.id(), *it.data()));
        }
    }
    assert_eq!(hits, vec![(2, Layer::Fold), (3, Layer::Selection)]);
}
