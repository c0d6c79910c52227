use rand::seq::SliceRandom;
use rand::Rng;

/// Shuffles population indices and partitions them into groups of
/// exactly `group_size`. The tail remainder is dropped unless
/// `merge_remainder` is set, in which case it is appended to the last
/// full group (§4.7 step 3).
pub fn assemble_groups(
    population_len: usize,
    group_size: usize,
    merge_remainder: bool,
    rng: &mut impl Rng,
) -> Vec<Vec<usize>> {
    let mut order: Vec<usize> = (0..population_len).collect();
    order.shuffle(rng);

    if group_size == 0 {
        return Vec::new();
    }

    let mut groups: Vec<Vec<usize>> = order.chunks(group_size).map(|c| c.to_vec()).collect();

    if let Some(last) = groups.last() {
        if last.len() < group_size {
            if merge_remainder && groups.len() > 1 {
                let remainder = groups.pop().unwrap();
                groups.last_mut().unwrap().extend(remainder);
            } else {
                groups.pop();
            }
        }
    }

    groups
}
