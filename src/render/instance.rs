//! GPU-uploadable sprite instances

use bytemuck::{Pod, Zeroable};

use super::DrawCall;
use super::sheet::SpriteSheet;

/// One textured quad, laid out for a per-instance vertex buffer
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SpriteInstance {
    /// Top-left in screen pixels
    pub dest: [f32; 2],
    /// Drawn size in screen pixels
    pub size: [f32; 2],
    /// Normalized texture coordinates; x is swapped for flipped sprites
    pub uv_min: [f32; 2],
    pub uv_max: [f32; 2],
    pub sheet: u32,
}

impl SpriteInstance {
    /// Convert a draw call against the sheet it references
    pub fn from_draw(call: &DrawCall, sheet: &SpriteSheet) -> Option<Self> {
        if sheet.is_empty() || call.src.w == 0 || call.src.h == 0 {
            return None;
        }
        let (w, h) = (sheet.width as f32, sheet.height as f32);
        let mut u0 = call.src.x as f32 / w;
        let mut u1 = (call.src.x + call.src.w) as f32 / w;
        if call.flip {
            std::mem::swap(&mut u0, &mut u1);
        }
        Some(Self {
            dest: call.dest.to_array(),
            size: [call.src.w as f32 * call.scale, call.src.h as f32 * call.scale],
            uv_min: [u0, call.src.y as f32 / h],
            uv_max: [u1, (call.src.y + call.src.h) as f32 / h],
            sheet: call.sheet.0,
        })
    }
}

/// Raw bytes for upload
pub fn as_bytes(instances: &[SpriteInstance]) -> &[u8] {
    bytemuck::cast_slice(instances)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::sheet::{SheetHandle, SrcRect};
    use glam::Vec2;

    fn call(flip: bool) -> DrawCall {
        DrawCall {
            sheet: SheetHandle(7),
            src: SrcRect { x: 64, y: 0, w: 64, h: 64 },
            dest: Vec2::new(10.0, 20.0),
            scale: 1.75,
            flip,
        }
    }

    #[test]
    fn test_instance_uvs_and_size() {
        let sheet = SpriteSheet::new(SheetHandle(7), 256, 64, 64, 64);
        let inst = SpriteInstance::from_draw(&call(false), &sheet).unwrap();
        assert_eq!(inst.size, [112.0, 112.0]);
        assert_eq!(inst.uv_min, [0.25, 0.0]);
        assert_eq!(inst.uv_max, [0.5, 1.0]);
        assert_eq!(inst.sheet, 7);
    }

    #[test]
    fn test_flip_swaps_u() {
        let sheet = SpriteSheet::new(SheetHandle(7), 256, 64, 64, 64);
        let inst = SpriteInstance::from_draw(&call(true), &sheet).unwrap();
        assert_eq!(inst.uv_min[0], 0.5);
        assert_eq!(inst.uv_max[0], 0.25);
    }

    #[test]
    fn test_empty_sheet_has_no_instance() {
        let sheet = SpriteSheet::new(SheetHandle(7), 0, 0, 64, 64);
        assert!(SpriteInstance::from_draw(&call(false), &sheet).is_none());
    }

    #[test]
    fn test_byte_layout() {
        let sheet = SpriteSheet::new(SheetHandle(7), 256, 64, 64, 64);
        let inst = SpriteInstance::from_draw(&call(false), &sheet).unwrap();
        assert_eq!(std::mem::size_of::<SpriteInstance>(), 36);
        assert_eq!(as_bytes(&[inst, inst]).len(), 72);
    }
}
