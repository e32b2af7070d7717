/// Inventory-grid footprint of an item.
///
/// `width`×`height` are the unrotated cell dimensions; the `rotated` flag swaps
/// them for display and packing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Footprint {
    pub width: u32,
    pub height: u32,
    pub rotated: bool,
}

impl Footprint {
    pub const UNIT: Self = Self::new(1, 1);

    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            rotated: false,
        }
    }

    /// Returns `(w, h)` as packed in the grid: swapped when rotated.
    pub const fn inventory_size(&self) -> (u32, u32) {
        if self.rotated {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        }
    }
}

impl Default for Footprint {
    fn default() -> Self {
        Self::UNIT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn rotation_swaps_dimensions(w in 1u32..16, h in 1u32..16) {
            let mut footprint = Footprint::new(w, h);
            prop_assert_eq!(footprint.inventory_size(), (w, h));

            footprint.rotated = true;
            prop_assert_eq!(footprint.inventory_size(), (h, w));
        }
    }
}
