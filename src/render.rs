use pixelblast_core::{BlastError, GpuRenderer};
use web_sys as web;

/// Create a WebGPU surface on `canvas` and build the renderer for it.
pub async fn init_renderer(
    canvas: web::HtmlCanvasElement,
) -> Result<GpuRenderer<'static>, BlastError> {
    let instance = wgpu::Instance::default();
    let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas))?;
    GpuRenderer::new(&instance, surface).await
}
