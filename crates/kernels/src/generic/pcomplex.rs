//! Packed complex arithmetic on interleaved `(re, im)` pairs

#[inline(always)]
pub(crate) fn cmul(ar: f32, ai: f32, br: f32, bi: f32) -> (f32, f32) {
    (ar * br - ai * bi, ar * bi + ai * br)
}

/// `dst = dst * src`, element-wise complex product
pub fn pcomplex_mul2(dst: &mut [f32], src: &[f32]) {
    for (d, s) in dst.chunks_exact_mut(2).zip(src.chunks_exact(2)) {
        let (re, im) = cmul(d[0], d[1], s[0], s[1]);
        d[0] = re;
        d[1] = im;
    }
}

/// `dst = a * b`, element-wise complex product
pub fn pcomplex_mul3(dst: &mut [f32], a: &[f32], b: &[f32]) {
    for ((d, x), y) in dst.chunks_exact_mut(2).zip(a.chunks_exact(2)).zip(b.chunks_exact(2)) {
        let (re, im) = cmul(x[0], x[1], y[0], y[1]);
        d[0] = re;
        d[1] = im;
    }
}
