/// Binary membership grid produced by one color-band test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl Mask {
    pub(crate) fn new(width: u32, height: u32, bits: Vec<bool>) -> Self {
        debug_assert_eq!(bits.len(), width as usize * height as usize);
        Self {
            width,
            height,
            bits,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn is_set(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.bits[y as usize * self.width as usize + x as usize]
    }

    pub fn count_set(&self) -> u64 {
        self.bits.iter().filter(|&&bit| bit).count() as u64
    }
}
