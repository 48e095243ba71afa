//! Overflow and underflow predicates for wrap-around bit-vector
//! arithmetic.
//!
//! Each constructor builds a boolean term from comparison and
//! extension primitives stating that the named operation does NOT wrap
//! at the given width. Multiplication guards compute the product at
//! double width and therefore require `width <= 32`; the others accept
//! any width up to 63.

use satsieve_smt::terms::SmtTerm;

fn zero(width: u32) -> SmtTerm {
    SmtTerm::bv(0, width)
}

fn all_ones(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

fn signed_min(width: u32) -> u64 {
    1u64 << (width - 1)
}

fn signed_max(width: u32) -> u64 {
    (1u64 << (width - 1)) - 1
}

/// `a + b` does not exceed the largest representable value.
pub fn add_no_overflow(a: &SmtTerm, b: &SmtTerm, width: u32, signed: bool) -> SmtTerm {
    if signed {
        // Only two non-negative addends can wrap past the maximum.
        SmtTerm::and(vec![
            a.clone().bv_sge(zero(width)),
            b.clone().bv_sge(zero(width)),
        ])
        .implies(a.clone().bv_add(b.clone()).bv_sge(zero(width)))
    } else {
        // With one carry bit of headroom the sum's top bit stays clear.
        a.clone()
            .zero_extend(1)
            .bv_add(b.clone().zero_extend(1))
            .extract(width, width)
            .eq(SmtTerm::bv(0, 1))
    }
}

/// `a + b` does not wrap past the smallest representable value.
/// Signed interpretation; unsigned addition cannot underflow.
pub fn add_no_underflow(a: &SmtTerm, b: &SmtTerm, width: u32) -> SmtTerm {
    SmtTerm::and(vec![
        a.clone().bv_slt(zero(width)),
        b.clone().bv_slt(zero(width)),
    ])
    .implies(a.clone().bv_add(b.clone()).bv_slt(zero(width)))
}

/// `a - b` does not exceed the largest representable value.
/// Signed interpretation; unsigned subtraction cannot overflow.
pub fn sub_no_overflow(a: &SmtTerm, b: &SmtTerm, width: u32) -> SmtTerm {
    SmtTerm::and(vec![
        a.clone().bv_sge(zero(width)),
        b.clone().bv_slt(zero(width)),
    ])
    .implies(a.clone().bv_sub(b.clone()).bv_sge(zero(width)))
}

/// `a - b` does not wrap past the smallest representable value.
pub fn sub_no_underflow(a: &SmtTerm, b: &SmtTerm, width: u32, signed: bool) -> SmtTerm {
    if signed {
        SmtTerm::and(vec![
            a.clone().bv_slt(zero(width)),
            b.clone().bv_sgt(zero(width)),
        ])
        .implies(a.clone().bv_sub(b.clone()).bv_slt(zero(width)))
    } else {
        a.clone().bv_uge(b.clone())
    }
}

/// `a * b` does not exceed the largest representable value. The product
/// is computed at double width, so `width` must be at most 32.
pub fn mul_no_overflow(a: &SmtTerm, b: &SmtTerm, width: u32, signed: bool) -> SmtTerm {
    debug_assert!(width <= 32, "double-width product must fit 64 bits");
    if signed {
        let wide = a
            .clone()
            .sign_extend(width)
            .bv_mul(b.clone().sign_extend(width));
        wide.bv_sle(SmtTerm::bv(signed_max(width), 2 * width))
    } else {
        let wide = a
            .clone()
            .zero_extend(width)
            .bv_mul(b.clone().zero_extend(width));
        wide.extract(2 * width - 1, width).eq(zero(width))
    }
}

/// `a * b` does not wrap past the smallest representable value.
/// Signed interpretation; unsigned multiplication cannot underflow.
/// `width` must be at most 32.
pub fn mul_no_underflow(a: &SmtTerm, b: &SmtTerm, width: u32) -> SmtTerm {
    debug_assert!(width <= 32, "double-width product must fit 64 bits");
    let wide = a
        .clone()
        .sign_extend(width)
        .bv_mul(b.clone().sign_extend(width));
    // The minimum of the original width, sign-extended to double width.
    let min_wide = ((1u128 << (2 * width)) - (1u128 << (width - 1))) as u64;
    wide.bv_sge(SmtTerm::bv(min_wide, 2 * width))
}

/// `a sdiv b` does not overflow: the only wrapping case is dividing the
/// minimum value by minus one.
pub fn sdiv_no_overflow(a: &SmtTerm, b: &SmtTerm, width: u32) -> SmtTerm {
    SmtTerm::and(vec![
        a.clone().eq(SmtTerm::bv(signed_min(width), width)),
        b.clone().eq(SmtTerm::bv(all_ones(width), width)),
    ])
    .not()
}
