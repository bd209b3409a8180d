/// Picks the surface format: the surface's preferred (first) format, or an
/// sRGB variant from the list when `prefer_srgb` is set.
pub(crate) fn choose_surface_format(
    formats: &[wgpu::TextureFormat],
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    let first = *formats.first()?;

    if prefer_srgb {
        let preferred = [
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ];
        for f in preferred {
            if formats.contains(&f) {
                return Some(f);
            }
        }
    }

    Some(first)
}

/// Backends usable on this platform out of `requested`.
pub(crate) fn available_backends(requested: wgpu::Backends) -> wgpu::Backends {
    wgpu::Instance::enabled_backend_features() & requested
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::TextureFormat as F;

    #[test]
    fn empty_format_list_has_no_choice() {
        assert_eq!(choose_surface_format(&[], true), None);
        assert_eq!(choose_surface_format(&[], false), None);
    }

    #[test]
    fn preferred_format_is_first() {
        let formats = [F::Bgra8Unorm, F::Bgra8UnormSrgb];
        assert_eq!(choose_surface_format(&formats, false), Some(F::Bgra8Unorm));
    }

    #[test]
    fn srgb_preference_picks_srgb_variant() {
        let formats = [F::Bgra8Unorm, F::Rgba8UnormSrgb];
        assert_eq!(choose_surface_format(&formats, true), Some(F::Rgba8UnormSrgb));
    }

    #[test]
    fn srgb_preference_without_srgb_falls_back() {
        let formats = [F::Rgba16Float, F::Rgba8Unorm];
        assert_eq!(choose_surface_format(&formats, true), Some(F::Rgba16Float));
    }

    #[test]
    fn no_requested_backends_leaves_nothing() {
        assert!(available_backends(wgpu::Backends::empty()).is_empty());
    }
}
