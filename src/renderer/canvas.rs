//! `<canvas>` backed surface

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use super::{AssetProgress, Sprite, Surface};
use crate::sim::Aabb;

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    images: HashMap<Sprite, HtmlImageElement>,
}

impl CanvasSurface {
    /// Grab the 2D context and start loading every sprite from `asset_dir`
    pub fn new(canvas: HtmlCanvasElement, asset_dir: &str) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let progress = Rc::new(RefCell::new(AssetProgress::new(Sprite::ALL.len())));
        let mut images = HashMap::new();
        for sprite in Sprite::ALL {
            let img = HtmlImageElement::new()?;
            watch_load(&img, sprite, Rc::clone(&progress));
            img.set_src(&format!("{asset_dir}/{}.png", sprite.asset_name()));
            images.insert(sprite, img);
        }

        Ok(Self {
            canvas,
            ctx,
            images,
        })
    }

    /// Match the backing store to the viewport
    pub fn resize(&self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }
}

fn watch_load(img: &HtmlImageElement, sprite: Sprite, progress: Rc<RefCell<AssetProgress>>) {
    let on_settle = move |ok: bool| {
        if !ok {
            log::warn!("Failed to load: {}.png", sprite.asset_name());
        }
        let mut progress = progress.borrow_mut();
        if progress.settle(ok) {
            log::info!(
                "Assets loaded ({} of {} failed)",
                progress.failed,
                progress.total
            );
        }
    };
    let on_error = on_settle.clone();

    let onload = Closure::<dyn FnMut()>::new(move || on_settle(true));
    img.set_onload(Some(onload.as_ref().unchecked_ref()));
    onload.forget();

    let onerror = Closure::<dyn FnMut()>::new(move || on_error(false));
    img.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    onerror.forget();
}

impl Surface for CanvasSurface {
    fn clear(&mut self, width: f32, height: f32) {
        self.ctx.clear_rect(0.0, 0.0, width as f64, height as f64);
    }

    fn sprite_ready(&self, sprite: Sprite) -> bool {
        self.images
            .get(&sprite)
            .is_some_and(|img| img.complete() && img.natural_height() != 0)
    }

    fn draw_sprite(&mut self, sprite: Sprite, bounds: Aabb) {
        let Some(img) = self.images.get(&sprite) else {
            return;
        };
        if let Err(e) = self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
            img,
            bounds.min.x as f64,
            bounds.min.y as f64,
            bounds.size.x as f64,
            bounds.size.y as f64,
        ) {
            log::warn!("Draw {} failed: {e:?}", sprite.asset_name());
        }
    }

    fn fill_rect(&mut self, bounds: Aabb, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(
            bounds.min.x as f64,
            bounds.min.y as f64,
            bounds.size.x as f64,
            bounds.size.y as f64,
        );
    }
}
