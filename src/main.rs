use std::sync::Arc;

use glam::{Mat4, Vec3};
use tracing::{info, warn};
use winit::{
    event::*,
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Window},
};

use flycam::controller::{CameraController, InputState};
use flycam::model::FlyCamera;
use flycam::view::{gpu_init::GpuContext, render, CameraUniform, LightingUniform};
use flycam::{logging, utils};

const Z_NEAR: f32 = 0.1;
const Z_FAR: f32 = 1000.0;

struct App {
    // Core GPU resources
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    size: winit::dpi::PhysicalSize<u32>,
    window: Arc<Window>,

    // Rendering state
    pipeline: wgpu::RenderPipeline,
    scene_mesh: utils::MeshBuffer,
    depth_texture: wgpu::Texture,
    depth_view: wgpu::TextureView,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,

    // egui
    egui_renderer: egui_wgpu::Renderer,
    egui_state: egui_winit::State,
    egui_ctx: egui::Context,

    // Camera state
    camera: FlyCamera,
    input_state: InputState,
    camera_controller: CameraController,

    // Frame timing
    last_frame_time: std::time::Instant,
    fps: f32,
    frame_count: u32,
    fps_timer: f32,
}

/// Ground plane plus a handful of lit boxes and a small white lamp cube.
fn build_scene_mesh() -> utils::Mesh {
    let mut scene = utils::create_ground_mesh(50.0);

    let crate_color = [0.65, 0.45, 0.25, 1.0];
    for (x, z) in [(0.0, 0.0), (2.5, -3.0), (-3.0, -6.0), (4.0, -8.0), (-1.5, 2.0)] {
        scene.append(utils::create_box_mesh([x, 0.5, z], 0.5, crate_color));
    }

    // Lamp cube at the light position.
    scene.append(utils::create_box_mesh([1.2, 1.0, 2.0], 0.1, [1.0, 1.0, 1.0, 1.0]));

    scene
}

impl App {
    async fn new(window: Arc<Window>) -> Self {
        let size = window.inner_size();

        let gpu = GpuContext::new(window.clone(), size.width, size.height).await;
        let device = gpu.device.clone();
        let queue = gpu.queue.clone();
        let config = gpu.config.clone();

        let depth_format = wgpu::TextureFormat::Depth32Float;
        let (depth_texture, depth_view) =
            render::create_depth_texture(&device, size.width, size.height);

        // Camera starts a little above the floor, looking down -Z at the boxes.
        let camera = FlyCamera::at(Vec3::new(0.0, 1.5, 3.0));

        let camera_resources = render::create_camera_resources(&device);
        let camera_buffer = camera_resources.camera_buffer;
        let lighting_buffer = camera_resources.lighting_buffer;
        let camera_bind_group = camera_resources.camera_bind_group;

        let aspect = size.width as f32 / size.height as f32;
        let view_proj =
            Mat4::perspective_rh(camera.zoom().to_radians(), aspect, Z_NEAR, Z_FAR)
                * camera.view_matrix();
        queue.write_buffer(
            &camera_buffer,
            0,
            bytemuck::bytes_of(&CameraUniform {
                view_proj: view_proj.to_cols_array_2d(),
            }),
        );

        // Static sun; pointing roughly toward the lamp side of the scene.
        queue.write_buffer(
            &lighting_buffer,
            0,
            bytemuck::bytes_of(&LightingUniform {
                sun_dir: [0.5, 1.0, 0.3],
                sun_intensity: 0.7,
                ambient: 0.3,
                _pad1: 0.0,
                _pad2: 0.0,
                _pad3: 0.0,
            }),
        );

        let pipeline = render::create_scene_pipeline(
            &device,
            config.format,
            &camera_resources.bind_group_layout,
            depth_format,
        );

        let scene_mesh = build_scene_mesh().upload(&device);

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            None,
            None,
            None,
        );
        let egui_renderer =
            egui_wgpu::Renderer::new(&device, config.format, egui_wgpu::RendererOptions::default());

        Self {
            surface: gpu.surface,
            device,
            queue,
            config,
            size,
            window,
            pipeline,
            scene_mesh,
            depth_texture,
            depth_view,
            camera_buffer,
            camera_bind_group,
            egui_renderer,
            egui_state,
            egui_ctx,
            camera,
            input_state: InputState::new(),
            camera_controller: CameraController::new(),
            last_frame_time: std::time::Instant::now(),
            fps: 0.0,
            frame_count: 0,
            fps_timer: 0.0,
        }
    }

    fn lock_cursor(&mut self, lock: bool) {
        if lock {
            let _ = self
                .window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Confined));
            self.window.set_cursor_visible(false);
        } else {
            let _ = self.window.set_cursor_grab(CursorGrabMode::None);
            self.window.set_cursor_visible(true);
        }
        self.input_state.cursor_locked = lock;
    }

    fn input(&mut self, event: &WindowEvent) -> bool {
        // Let egui claim the event first (slider drags etc.).
        let egui_captured = self
            .egui_state
            .on_window_event(self.window.as_ref(), event)
            .consumed;
        if egui_captured {
            return true;
        }

        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state,
                        physical_key: PhysicalKey::Code(code),
                        ..
                    },
                ..
            } => {
                match state {
                    ElementState::Pressed => {
                        if *code == KeyCode::Escape {
                            self.lock_cursor(false);
                        }
                        self.input_state.key_down(*code);
                    }
                    ElementState::Released => {
                        self.input_state.key_up(*code);
                    }
                }
                true
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                self.lock_cursor(true);
                true
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 20.0,
                };
                self.input_state.push_scroll(lines);
                true
            }
            WindowEvent::Focused(false) => {
                self.input_state.clear_keys();
                true
            }
            _ => false,
        }
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);

            let (depth_texture, depth_view) =
                render::create_depth_texture(&self.device, new_size.width, new_size.height);
            self.depth_texture = depth_texture;
            self.depth_view = depth_view;
        }
    }

    fn handle_mouse_motion(&mut self, dx: f64, dy: f64) {
        self.input_state.push_look(dx as f32, dy as f32);
    }

    fn update(&mut self, dt: f32) {
        self.frame_count += 1;
        self.fps_timer += dt;
        if self.fps_timer >= 1.0 {
            self.fps = self.frame_count as f32 / self.fps_timer;
            self.frame_count = 0;
            self.fps_timer = 0.0;
        }

        self.camera_controller
            .update(&mut self.camera, &mut self.input_state, dt);

        let aspect = self.size.width as f32 / self.size.height as f32;
        let view_proj =
            Mat4::perspective_rh(self.camera.zoom().to_radians(), aspect, Z_NEAR, Z_FAR)
                * self.camera.view_matrix();
        self.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::bytes_of(&CameraUniform {
                view_proj: view_proj.to_cols_array_2d(),
            }),
        );
    }

    fn render_ui(&mut self) -> (Vec<egui::epaint::ClippedShape>, egui::TexturesDelta) {
        let raw_input = self.egui_state.take_egui_input(&self.window);
        let fps = self.fps;
        let pos = self.camera.position;
        let yaw = self.camera.yaw();
        let pitch = self.camera.pitch();
        let mut zoom = self.camera.zoom();
        let mut zoom_changed = false;

        let output = self.egui_ctx.run(raw_input, |ctx| {
            egui::Window::new("Debug")
                .default_pos([8.0, 8.0])
                .show(ctx, |ui| {
                    ui.label(egui::RichText::new(format!("FPS: {fps:.0}")).small());
                    ui.label(
                        egui::RichText::new(format!(
                            "Pos: {:.1}, {:.1}, {:.1}",
                            pos.x, pos.y, pos.z
                        ))
                        .small(),
                    );
                    ui.label(
                        egui::RichText::new(format!("Yaw: {yaw:.1} Pitch: {pitch:.1}")).small(),
                    );
                    ui.separator();
                    ui.label(egui::RichText::new("WASD - Move").small());
                    ui.label(egui::RichText::new("Space - Thrust up").small());
                    ui.label(egui::RichText::new("Scroll - Zoom").small());
                    ui.label(egui::RichText::new("Click - Capture mouse").small());
                    ui.label(egui::RichText::new("Esc - Release mouse").small());
                });

            egui::Window::new("Settings")
                .default_pos([self.config.width as f32 - 150.0, 8.0])
                .show(ctx, |ui| {
                    ui.label(egui::RichText::new("FOV").small());
                    if ui
                        .add(egui::Slider::new(&mut zoom, 1.0..=45.0).step_by(1.0))
                        .changed()
                    {
                        zoom_changed = true;
                    }
                });
        });

        if zoom_changed {
            self.camera.set_zoom(zoom);
        }

        self.egui_state
            .handle_platform_output(&self.window, output.platform_output);
        (output.shapes, output.textures_delta)
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let (shapes, textures_delta) = self.render_ui();
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: self.window.scale_factor() as f32,
        };
        let primitives = self
            .egui_ctx
            .tessellate(shapes, self.window.scale_factor() as f32);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render_encoder"),
            });

        for (id, image_delta) in &textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }
        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &primitives,
            &screen_descriptor,
        );

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.1,
                            g: 0.1,
                            b: 0.1,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.scene_mesh.vertex_buffer.slice(..));
            render_pass
                .set_index_buffer(self.scene_mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..self.scene_mesh.index_count, 0, 0..1);
        }

        {
            let egui_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.egui_renderer
                .render(&mut egui_pass.forget_lifetime(), &primitives, &screen_descriptor);
        }

        for id in &textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn main() {
    logging::init();

    let event_loop = EventLoop::new().unwrap();
    let window_attributes = Window::default_attributes()
        .with_title("flycam")
        .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));
    let window = event_loop.create_window(window_attributes).unwrap();
    let window = Arc::new(window);

    info!("window created, initializing GPU");
    let mut app = pollster::block_on(App::new(window.clone()));

    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent {
                ref event,
                window_id,
            } if window_id == app.window.id() => {
                if !app.input(event) {
                    match event {
                        WindowEvent::CloseRequested => elwt.exit(),
                        WindowEvent::Resized(physical_size) => {
                            app.resize(*physical_size);
                        }
                        WindowEvent::RedrawRequested => {
                            let now = std::time::Instant::now();
                            let dt = (now - app.last_frame_time).as_secs_f32();
                            app.last_frame_time = now;

                            app.update(dt);

                            match app.render() {
                                Ok(_) => {}
                                Err(wgpu::SurfaceError::Lost) => app.resize(app.size),
                                Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                                Err(e) => warn!("surface error: {e:?}"),
                            }
                        }
                        _ => {}
                    }
                }
            }
            Event::DeviceEvent {
                event: DeviceEvent::MouseMotion { delta },
                ..
            } => {
                app.handle_mouse_motion(delta.0, delta.1);
            }
            Event::AboutToWait => {
                app.window.request_redraw();
            }
            _ => {}
        })
        .unwrap();
}
