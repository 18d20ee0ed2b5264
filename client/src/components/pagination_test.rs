use super::*;

#[test]
fn window_centres_on_current_page() {
    assert_eq!(page_window(5, 10, 2), vec![3, 4, 5, 6, 7]);
}

#[test]
fn window_clamps_at_both_ends() {
    assert_eq!(page_window(1, 10, 2), vec![1, 2, 3]);
    assert_eq!(page_window(10, 10, 2), vec![8, 9, 10]);
}

#[test]
fn single_page_and_out_of_range_page() {
    assert_eq!(page_window(1, 1, 2), vec![1]);
    assert_eq!(page_window(0, 0, 2), vec![1]);
    assert_eq!(page_window(40, 3, 2), vec![1, 2, 3]);
}
