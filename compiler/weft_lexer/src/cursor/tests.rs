use super::*;

#[test]
fn window_end_reads_as_zero() {
    let cursor = Cursor::new("abcdef", 2, 4);
    assert_eq!(cursor.current(), b'c');
    assert_eq!(cursor.peek_at(1), b'd');
    assert_eq!(cursor.peek_at(2), 0);
    assert_eq!(cursor.rest(), b"cd");
}

#[test]
fn advance_stops_at_end() {
    let mut cursor = Cursor::new("ab", 0, 10);
    cursor.advance_n(5);
    assert!(cursor.is_eof());
    assert_eq!(cursor.pos(), 2);
    cursor.advance();
    assert_eq!(cursor.pos(), 2);
}

#[test]
fn eat_while_respects_window() {
    let mut cursor = Cursor::new("aaaaab", 1, 3);
    cursor.eat_while(|b| b == b'a');
    assert_eq!(cursor.pos(), 3);
}
