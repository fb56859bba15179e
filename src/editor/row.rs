const KILO_TAB_STOP: usize = 8;

/// One line of the buffer. `render` is always the tab-expanded copy of
/// `contents`; every mutator recomputes it before returning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    contents: Vec<u8>,
    render: Vec<u8>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut row = Self::new();
        row.append_bytes(bytes);
        row
    }

    pub fn contents(&self) -> &[u8] {
        &self.contents
    }

    pub fn render(&self) -> &[u8] {
        &self.render
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    /// Inserts at `at`, or appends if `at` is past the end.
    pub fn insert_byte(&mut self, at: usize, byte: u8) {
        let at = at.min(self.contents.len());
        self.contents.insert(at, byte);
        self.update_render();
    }

    pub fn delete_byte(&mut self, at: usize) -> bool {
        if at >= self.contents.len() {
            return false;
        }
        self.contents.remove(at);
        self.update_render();
        true
    }

    pub fn append_bytes(&mut self, bytes: &[u8]) {
        self.contents.extend_from_slice(bytes);
        self.update_render();
    }

    /// Cuts the row at `at` and returns everything after it.
    pub fn split_off(&mut self, at: usize) -> Vec<u8> {
        let at = at.min(self.contents.len());
        let remainder = self.contents.split_off(at);
        self.update_render();
        remainder
    }

    pub fn cx_to_rx(&self, cx: usize) -> usize {
        self.contents.iter().take(cx).fold(0, |rx, &byte| {
            if byte == b'\t' {
                rx + KILO_TAB_STOP - (rx % KILO_TAB_STOP)
            } else {
                rx + 1
            }
        })
    }

    fn update_render(&mut self) {
        self.render = expand_tabs(&self.contents);
    }
}

pub fn expand_tabs(bytes: &[u8]) -> Vec<u8> {
    let mut render = Vec::with_capacity(bytes.len());
    for &byte in bytes {
        if byte == b'\t' {
            render.push(b' ');
            while render.len() % KILO_TAB_STOP != 0 {
                render.push(b' ');
            }
        } else {
            render.push(byte);
        }
    }
    render
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn tabs_expand_to_next_stop() {
        assert_eq!(expand_tabs(b"\tx"), b"        x");
        assert_eq!(expand_tabs(b"abc\tx"), b"abc     x");
        assert_eq!(expand_tabs(b"abcdefgh\tx"), b"abcdefgh        x");
        assert_eq!(expand_tabs(b"\t\t"), vec![b' '; 16]);
    }

    #[test]
    fn cx_to_rx_honours_tab_stops() {
        let row = Row::from_bytes(b"a\tb\tc");
        assert_eq!(row.cx_to_rx(0), 0);
        assert_eq!(row.cx_to_rx(1), 1);
        assert_eq!(row.cx_to_rx(2), 8);
        assert_eq!(row.cx_to_rx(3), 9);
        assert_eq!(row.cx_to_rx(4), 16);
        assert_eq!(row.cx_to_rx(5), 17);
        // Offsets past the end stop counting at the last byte.
        assert_eq!(row.cx_to_rx(50), 17);
    }

    #[test]
    fn out_of_range_edits_are_clamped_or_ignored() {
        let mut row = Row::from_bytes(b"ab");
        row.insert_byte(10, b'c');
        assert_eq!(row.contents(), b"abc");
        assert!(!row.delete_byte(3));
        assert_eq!(row.contents(), b"abc");
        assert!(row.delete_byte(0));
        assert_eq!(row.contents(), b"bc");
        assert_eq!(row.split_off(9), Vec::<u8>::new());
    }

    #[test]
    fn split_off_keeps_render_in_step() {
        let mut row = Row::from_bytes(b"ab\tcd");
        let tail = row.split_off(3);
        assert_eq!(tail, b"cd");
        assert_eq!(row.contents(), b"ab\t");
        assert_eq!(row.render(), b"ab      ");
    }

    fn edit() -> impl Strategy<Value = (u8, usize, u8)> {
        (0u8..3, 0usize..20, prop_oneof![Just(b'\t'), Just(b'x'), Just(b' ')])
    }

    proptest! {
        #[test]
        fn render_always_matches_contents(
            start in proptest::collection::vec(prop_oneof![Just(b'\t'), any::<u8>()], 0..16),
            edits in proptest::collection::vec(edit(), 0..16),
        ) {
            let mut row = Row::from_bytes(&start);
            prop_assert_eq!(row.render().to_vec(), expand_tabs(row.contents()));
            for (op, at, byte) in edits {
                match op {
                    0 => row.insert_byte(at, byte),
                    1 => { row.delete_byte(at); }
                    _ => row.append_bytes(&[byte, b'\t']),
                }
                prop_assert_eq!(row.render().to_vec(), expand_tabs(row.contents()));
            }
        }

        #[test]
        fn cx_to_rx_is_monotonic(
            bytes in proptest::collection::vec(prop_oneof![Just(b'\t'), Just(b'a')], 0..32),
        ) {
            let row = Row::from_bytes(&bytes);
            for cx in 0..bytes.len() {
                prop_assert!(row.cx_to_rx(cx) <= row.cx_to_rx(cx + 1));
            }
            prop_assert_eq!(row.cx_to_rx(bytes.len()), row.render().len());
        }

        #[test]
        fn cx_to_rx_is_identity_without_tabs(
            bytes in proptest::collection::vec(any::<u8>().prop_filter("no tabs", |b| *b != b'\t'), 0..32),
        ) {
            let row = Row::from_bytes(&bytes);
            for cx in 0..=bytes.len() {
                prop_assert_eq!(row.cx_to_rx(cx), cx);
            }
        }
    }
}
