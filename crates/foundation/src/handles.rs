/// Generational handle to a renderer-owned primitive.
///
/// The index addresses a slot in the renderer's arena; the generation
/// detects stale handles after a slot has been reused.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PrimitiveHandle {
    index: u32,
    generation: u32,
}

impl PrimitiveHandle {
    pub fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::PrimitiveHandle;

    #[test]
    fn same_slot_different_generation_are_distinct() {
        let a = PrimitiveHandle::new(3, 0);
        let b = PrimitiveHandle::new(3, 1);
        assert_ne!(a, b);
        assert_eq!(a.index(), b.index());
    }
}
