//! Bit manipulation and stride helpers.

/// Builds a mask with bit `i` set for every `i` in `indices`.
///
/// Every index must be below 32.
#[inline]
pub fn bit_mask_from_indices(indices: &[u32]) -> u32 {
    let mut bit_mask = 0u32;
    for &i in indices {
        debug_assert!(i < 32, "bit index {} out of range", i);
        bit_mask |= 1 << i;
    }
    bit_mask
}

/// Counts the zero bits below the lowest set bit. Returns 32 for 0.
#[inline]
pub const fn count_least_significant_zeros(value: u32) -> u32 {
    // Isolate the lowest set bit, then locate it by halving masks.
    let value = value & value.wrapping_neg();
    let mut count = 32;
    if value != 0 {
        count -= 1;
    }
    if value & 0x0000_FFFF != 0 {
        count -= 16;
    }
    if value & 0x00FF_00FF != 0 {
        count -= 8;
    }
    if value & 0x0F0F_0F0F != 0 {
        count -= 4;
    }
    if value & 0x3333_3333 != 0 {
        count -= 2;
    }
    if value & 0x5555_5555 != 0 {
        count -= 1;
    }
    count
}

/// Writes row-major packed strides for `sizes` into `strides`.
///
/// The innermost stride is 1; each outer stride is the product of all inner
/// sizes. Both slices must have the same length.
pub fn descending_packed_strides(sizes: &[u32], strides: &mut [u32]) {
    debug_assert_eq!(sizes.len(), strides.len());

    let mut stride = 1u32;
    for i in (0..strides.len()).rev() {
        strides[i] = stride;
        stride = stride.wrapping_mul(sizes[i]);
    }
}

/// Returns row-major packed strides for `sizes`.
pub fn packed_strides(sizes: &[u32]) -> Vec<u32> {
    let mut strides = vec![0; sizes.len()];
    descending_packed_strides(sizes, &mut strides);
    strides
}
