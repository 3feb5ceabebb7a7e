use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::{anyhow, bail, Context};
use chip8_core::{
    frame_bytes, Chip8Builder, Chip8Color, Chip8Mode, Palette, Quirks, SCREEN_HEIGHT,
    SCREEN_WIDTH,
};
use clap::Parser;
use sdl2::{
    event::Event,
    keyboard::Keycode,
    pixels::{Color, PixelFormatEnum},
    rect::Point,
    render::WindowCanvas,
};

mod keymap;

const DEFAULT_GRID_COLOR: Chip8Color = Chip8Color::new(0x40, 0x40, 0x40);

/// CHIP-8 Emulator
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Filepath to Chip-8 ROM file that will be executed
    #[clap(index = 1)]
    rom: PathBuf,

    /// Filepath to font file
    #[clap(long)]
    font: Option<PathBuf>,

    /// Background Color as HEX 0xAABBFF [default: 0x000000]
    #[clap(long)]
    background: Option<Chip8Color>,

    /// Foreground Color as HEX 0xAABBFF [default: 0xFFFFFF]
    #[clap(long)]
    foreground: Option<Chip8Color>,

    /// Display scaling factor
    #[clap(short, long, default_value_t = 10)]
    scale: u32,

    /// Instructions per second
    #[clap(short, long, default_value_t = 500)]
    ips: u32,

    /// PRNG seed
    #[clap(long)]
    seed: Option<u64>,

    /// Quirk preset: cosmac-vip, chip-48 or super-chip
    #[clap(long)]
    mode: Option<Chip8Mode>,

    /// Shift VY into VX on 8XY6/8XYE
    #[clap(long)]
    shift_uses_vy: Option<bool>,

    /// Set VF when FX1E overflows the index register
    #[clap(long)]
    index_overflow_flag: Option<bool>,

    /// Advance I after FX55/FX65
    #[clap(long)]
    bulk_increments_index: Option<bool>,

    /// Jump to XNN plus VX on BNNN
    #[clap(long)]
    jump_offset_uses_vx: Option<bool>,

    /// Reset VF on 8XY1/8XY2/8XY3
    #[clap(long)]
    logic_resets_flag: Option<bool>,

    /// Wrap sprites around the screen edges instead of clipping them
    #[clap(long)]
    wrap_sprites: Option<bool>,

    /// Maximum call stack depth
    #[clap(long)]
    stack_limit: Option<usize>,

    /// Draw a grid between pixels
    #[clap(long)]
    grid: bool,

    /// Grid Color as HEX 0xAABBFF [default: 0x404040]
    #[clap(long)]
    grid_color: Option<Chip8Color>,

    /// Print debug information
    #[clap(short, long)]
    debug: bool,
}

impl Args {
    fn quirks(&self) -> Quirks {
        let mut quirks = self.mode.map(Quirks::for_mode).unwrap_or_default();
        if let Some(v) = self.shift_uses_vy {
            quirks.shift_uses_secondary_register = v;
        }
        if let Some(v) = self.index_overflow_flag {
            quirks.add_index_sets_overflow_flag = v;
        }
        if let Some(v) = self.bulk_increments_index {
            quirks.bulk_register_ops_increment_index = v;
        }
        if let Some(v) = self.jump_offset_uses_vx {
            quirks.jump_with_offset_uses_vx = v;
        }
        if let Some(v) = self.logic_resets_flag {
            quirks.logic_ops_reset_flag = v;
        }
        if let Some(v) = self.wrap_sprites {
            quirks.draw_wraps_sprites = v;
        }
        if self.stack_limit.is_some() {
            quirks.stack_limit = self.stack_limit;
        }
        quirks
    }
}

/// Outline every CHIP-8 pixel, including the outer border.
fn draw_grid(canvas: &mut WindowCanvas, color: Chip8Color, scale: u32) -> Result<(), String> {
    let width = (SCREEN_WIDTH as u32 * scale) as i32;
    let height = (SCREEN_HEIGHT as u32 * scale) as i32;
    let scale = scale as i32;

    canvas.set_draw_color(Color::RGB(color.r, color.g, color.b));

    for y in 0..=SCREEN_HEIGHT as i32 {
        let py = (y * scale).min(height - 1);
        canvas.draw_line(Point::new(0, py), Point::new(width - 1, py))?;
    }

    for x in 0..=SCREEN_WIDTH as i32 {
        let px = (x * scale).min(width - 1);
        canvas.draw_line(Point::new(px, 0), Point::new(px, height - 1))?;
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = if args.debug { "trace" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if args.scale == 0 || args.scale > 100 {
        bail!("Display scaling factor must be between [1-100]");
    }

    if args.ips == 0 || args.ips > 1_000_000 {
        bail!("Instructions per second must be between [1-1000000]");
    }

    let rom_data = std::fs::read(&args.rom)
        .with_context(|| format!("Failed to read ROM file {}", args.rom.display()))?;

    let mut builder = Chip8Builder::new()
        .with_rom(rom_data)
        .with_quirks(args.quirks());

    if let Some(font) = &args.font {
        let font_data = std::fs::read(font)
            .with_context(|| format!("Failed to read font file {}", font.display()))?;
        builder = builder.with_font(font_data);
    }

    if let Some(seed) = args.seed {
        builder = builder.with_rng_seed(seed);
    }

    let palette = Palette {
        foreground: args.foreground.unwrap_or(Palette::default().foreground),
        background: args.background.unwrap_or(Palette::default().background),
    };

    let grid = args
        .grid
        .then(|| args.grid_color.unwrap_or(DEFAULT_GRID_COLOR));

    let mut chip = builder.build()?;

    let sdl_context = sdl2::init().map_err(|e| anyhow!(e))?;
    let video_subsystem = sdl_context.video().map_err(|e| anyhow!(e))?;

    let window = video_subsystem
        .window(
            "chip8-emulator",
            SCREEN_WIDTH as u32 * args.scale,
            SCREEN_HEIGHT as u32 * args.scale,
        )
        .position_centered()
        .build()?;

    let mut canvas = window.into_canvas().build()?;

    let bg = palette.background;
    canvas.set_draw_color(Color::RGB(bg.r, bg.g, bg.b));
    canvas.clear();
    canvas.present();

    let texture_creator = canvas.texture_creator();
    let mut texture = texture_creator.create_texture_streaming(
        PixelFormatEnum::RGBX8888,
        SCREEN_WIDTH as u32,
        SCREEN_HEIGHT as u32,
    )?;

    let mut event_pump = sdl_context.event_pump().map_err(|e| anyhow!(e))?;
    let mut frame = vec![palette.background; SCREEN_WIDTH * SCREEN_HEIGHT];

    let delta_update = Duration::new(0, 1_000_000_000u32 / args.ips);
    let mut next_update = Instant::now();
    let mut last_cycle = next_update;

    'running: loop {
        // Wait until next update
        let now = Instant::now();
        if let Some(delay) = next_update.checked_duration_since(now) {
            ::std::thread::sleep(delay);
        }
        next_update += delta_update;

        // Process events, remembering the last mapped key-down edge
        let mut pressed = None;
        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'running,
                Event::KeyDown {
                    scancode: Some(sc),
                    repeat: false,
                    ..
                } => {
                    if let Some(key) = keymap::keypad_index(sc) {
                        pressed = Some(key);
                    }
                }
                _ => {}
            }
        }
        let input = keymap::key_input(&event_pump.keyboard_state(), pressed);

        // Execute one CHIP-8 cycle
        let now = Instant::now();
        let elapsed = now - last_cycle;
        last_cycle = now;
        chip.cycle(&input, elapsed)?;

        // If display buffer was changed then draw changes on canvas
        if chip.display_changed() {
            chip.display().render(&palette, &mut frame);

            // Copy CHIP-8 display buffer into GPU texture
            texture.update(None, frame_bytes(&frame), SCREEN_WIDTH * 4)?;

            // Copy texture to Canvas
            canvas.copy(&texture, None, None).map_err(|e| anyhow!(e))?;

            if let Some(color) = grid {
                draw_grid(&mut canvas, color, args.scale).map_err(|e| anyhow!(e))?;
            }

            // present canvas on screen
            canvas.present();
        }
    }

    log::info!(
        "stopped at 0x{:03x}, {} unhandled instructions",
        chip.program_counter(),
        chip.unhandled_opcodes()
    );

    Ok(())
}
