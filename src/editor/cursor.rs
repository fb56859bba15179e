/// `cx`/`cy` index into the raw contents of the buffer; `cy == len` is the
/// empty line after the last row. `rx` is the on-screen column of `cx` and
/// is only meaningful after the viewport has been reconciled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub cx: usize,
    pub cy: usize,
    pub rx: usize,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn at(cx: usize, cy: usize) -> Self {
        Cursor { cx, cy, rx: 0 }
    }
}
