//! Table-driven boundary tests over `Dict::with_capacity`'s rounding and
//! the first-insertion growth ladder, parameterized with `rstest`.

use rdict::Dict;
use rstest::rstest;

#[rstest]
#[case(0, 0)] // zero requests no allocation; capacity is set lazily on first insert
#[case(1, 4)]
#[case(3, 4)]
#[case(4, 4)]
#[case(5, 8)]
#[case(9, 16)]
#[case(100, 128)]
fn with_capacity_rounds_up_to_a_power_of_two(
    #[case] requested: usize,
    #[case] expected_capacity: usize,
) {
    let d: Dict<u32, u32> = Dict::with_capacity(requested);
    assert_eq!(d.capacity(), expected_capacity);
}

#[rstest]
#[case(4)]
#[case(16)]
#[case(64)]
fn growth_preserves_every_key_across_several_capacities(#[case] start_capacity: usize) {
    let mut d: Dict<u32, u32> = Dict::with_capacity(start_capacity);
    for i in 0..(start_capacity as u32 * 4) {
        d.insert(i, i * 3);
    }
    for i in 0..(start_capacity as u32 * 4) {
        assert_eq!(d.get(&i), Some(&(i * 3)));
    }
}
