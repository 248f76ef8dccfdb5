use super::*;

fn scan_all(text: &str) -> Vec<PositionedChar> {
    let mut scanner = Scanner::new();
    scanner.feed(text);
    let mut out = Vec::new();
    while let Some(c) = scanner.next() {
        out.push(c);
    }
    out
}

#[test]
fn empty_input_yields_nothing() {
    assert!(scan_all("").is_empty());
}

#[test]
fn plain_text_preserves_every_character() {
    let chars = scan_all("AB");
    assert_eq!(chars.len(), 2);
    assert_eq!(chars[0], PositionedChar { ch: 'A', line: 0, col: 0 });
    assert_eq!(chars[1], PositionedChar { ch: 'B', line: 0, col: 1 });
}

#[test]
fn newline_resets_column_and_advances_line() {
    let chars = scan_all("A\nB");
    assert_eq!(chars[0], PositionedChar { ch: 'A', line: 0, col: 0 });
    assert_eq!(chars[1], PositionedChar { ch: '\n', line: 0, col: 1 });
    assert_eq!(chars[2], PositionedChar { ch: 'B', line: 1, col: 0 });
}

#[test]
fn comment_including_its_terminating_newline_is_elided() {
    let chars = scan_all("A#comment\nB");
    // '#' through the newline that ends the comment is dropped entirely;
    // only 'A' and 'B' (now on the next line) survive.
    assert_eq!(chars.len(), 2);
    assert_eq!(chars[0], PositionedChar { ch: 'A', line: 0, col: 0 });
    assert_eq!(chars[1], PositionedChar { ch: 'B', line: 1, col: 0 });
}

#[test]
fn comment_without_trailing_newline_consumes_rest_of_input() {
    let chars = scan_all("MOV # nothing after this matters");
    assert_eq!(chars.len(), 4);
    assert!(chars.iter().all(|c| "MOV".contains(c.ch)));
}

#[test]
fn feed_can_be_called_incrementally() {
    let mut scanner = Scanner::new();
    scanner.feed("A");
    scanner.feed("B\nC");
    let mut out = Vec::new();
    while let Some(c) = scanner.next() {
        out.push(c.ch);
    }
    assert_eq!(out, vec!['A', 'B', '\n', 'C']);
}
