use pledge::{Error, Promise, all, filter, race};
use proptest::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone)]
enum Attempt {
    Resolve(u32),
    Reject(u32),
}

fn attempts() -> impl Strategy<Value = Vec<Attempt>> {
    prop::collection::vec(
        prop_oneof![
            any::<u32>().prop_map(Attempt::Resolve),
            any::<u32>().prop_map(Attempt::Reject),
        ],
        1..8,
    )
}

proptest! {
    #[test]
    fn only_the_first_settlement_is_observed(sequence in attempts()) {
        let (promise, resolver) = Promise::<u32>::pending();
        let reactions = Arc::new(AtomicUsize::new(0));

        let counted = reactions.clone();
        let _ = promise.then_or_else(
            move |v| { counted.fetch_add(1, Ordering::SeqCst); Ok(v) },
            |e| Err(e),
        );

        let accepted: Vec<bool> = sequence
            .iter()
            .map(|step| match step {
                Attempt::Resolve(v) => resolver.resolve(*v),
                Attempt::Reject(v) => resolver.reject(Error::msg(v.to_string())),
            })
            .collect();

        prop_assert!(accepted[0]);
        prop_assert!(accepted[1..].iter().all(|taken| !taken));

        let expected = match &sequence[0] {
            Attempt::Resolve(v) => Ok(*v),
            Attempt::Reject(v) => Err(Error::msg(v.to_string())),
        };
        prop_assert_eq!(promise.peek(), Some(expected.clone()));
        prop_assert_eq!(reactions.load(Ordering::SeqCst), usize::from(expected.is_ok()));
    }

    #[test]
    fn all_orders_by_input_not_settlement(
        values in prop::collection::vec(any::<u16>(), 0..12),
        seed in any::<u64>(),
    ) {
        let (promises, resolvers): (Vec<_>, Vec<_>) =
            values.iter().map(|_| Promise::<u16>::pending()).unzip();
        let combined = all(promises);

        let mut order: Vec<usize> = (0..values.len()).collect();
        let len = order.len();
        for i in (1..len).rev() {
            let j = (seed.rotate_left(i as u32) as usize) % (i + 1);
            order.swap(i, j);
        }
        for index in order {
            resolvers[index].resolve(values[index]);
        }

        prop_assert_eq!(combined.peek(), Some(Ok(values)));
    }

    #[test]
    fn filter_matches_iterator_filter(values in prop::collection::vec(any::<i32>(), 0..16)) {
        let promises: Vec<Promise<i32>> = values.iter().copied().map(Promise::resolved).collect();
        let expected: Vec<i32> = values.iter().copied().filter(|n| n % 3 == 0).collect();

        prop_assert_eq!(filter(promises, |n| n % 3 == 0).peek(), Some(Ok(expected)));
    }

    #[test]
    fn race_of_settled_inputs_takes_the_first(values in prop::collection::vec(any::<u8>(), 1..8)) {
        let promises: Vec<Promise<u8>> = values.iter().copied().map(Promise::resolved).collect();

        prop_assert_eq!(race(promises).peek(), Some(Ok(values[0])));
    }
}
