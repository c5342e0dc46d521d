use super::*;

#[test]
fn kernel_sums_to_one_in_q16() {
    for (r, s) in [(1, 0.5), (15, 5.0), (60, 20.0)] {
        let k = gaussian_kernel_q16(r, s).unwrap();
        assert_eq!(k.len(), (2 * r + 1) as usize);
        assert_eq!(k.iter().map(|&v| u64::from(v)).sum::<u64>(), 65536);
        assert!(k[r as usize] >= k[0]);
    }
    assert_eq!(gaussian_kernel_q16(0, 0.0).unwrap(), vec![1 << 16]);
    assert!(gaussian_kernel_q16(3, f32::NAN).is_err());
}

#[test]
fn canvas_blur_maps_to_half_sigma() {
    let p = BlurParams::from_canvas_blur(10.0);
    assert_eq!(p.sigma, 5.0);
    assert_eq!(p.radius, 15);
    let glow = BlurParams::from_canvas_blur(40.0);
    assert_eq!((glow.radius, glow.sigma), (60, 20.0));
    assert_eq!(BlurParams::from_canvas_blur(0.0).radius, 0);
}

#[test]
fn constant_interior_is_preserved() {
    let (w, h) = (41u32, 41u32);
    let mask = vec![200u8; (w * h) as usize];
    let out = blur_alpha_q16(&mask, w, h, BlurParams::from_canvas_blur(6.0)).unwrap();
    assert_eq!(out[(20 * w + 20) as usize], 200);
    // edges lose energy to the transparent outside
    assert!(out[0] < 200);
}

#[test]
fn single_dot_spreads_symmetrically() {
    let (w, h) = (21u32, 21u32);
    let mut mask = vec![0u8; (w * h) as usize];
    mask[(10 * w + 10) as usize] = 255;
    let out = blur_alpha_q16(&mask, w, h, BlurParams { radius: 4, sigma: 2.0 }).unwrap();
    let at = |x: u32, y: u32| out[(y * w + x) as usize];
    assert!(at(10, 10) < 255);
    assert!(at(11, 10) > 0);
    assert_eq!(at(9, 10), at(11, 10));
    assert_eq!(at(10, 8), at(10, 12));
    assert_eq!(at(0, 0), 0);
}

#[test]
fn mismatched_length_is_rejected() {
    assert!(blur_alpha_q16(&[0u8; 3], 2, 2, BlurParams::from_canvas_blur(4.0)).is_err());
}
