#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use sheet_core::{
    AnimateCommand, DragController, GestureEvent, GesturePhase, InterruptPolicy, SheetConfig,
    SheetHost, Size,
};

#[derive(Debug, Arbitrary)]
enum Op {
    Sample { translation: i16, velocity: i16, phase: u8 },
    Finish,
    Resize { height: u16 },
}

#[derive(Debug, Arbitrary)]
struct Input {
    height: u16,
    interrupt: bool,
    ops: Vec<Op>,
}

#[derive(Default)]
struct Checked {
    height: f64,
    commands: usize,
}

impl SheetHost for Checked {
    fn on_attach(&mut self, size: Size) {
        self.height = size.height;
    }

    fn on_geometry_change(&mut self, origin_y: f64) {
        assert!((0.0..=self.height).contains(&origin_y), "origin {origin_y} escaped container");
    }

    fn on_dim_alpha_change(&mut self, alpha: f64) {
        assert!((0.0..=1.0).contains(&alpha), "alpha {alpha} out of range");
    }

    fn on_animate_request(&mut self, command: &AnimateCommand) {
        assert!(command.target_dim_alpha >= 0.0 && command.target_dim_alpha <= 1.0);
        self.commands += 1;
    }
}

fuzz_target!(|input: Input| {
    let policy = if input.interrupt {
        InterruptPolicy::Interrupt
    } else {
        InterruptPolicy::Block
    };
    let config = SheetConfig::default().with_interrupt_policy(policy);
    let Ok(mut ctl) = DragController::new(config, Checked::default()) else {
        return;
    };
    let height = f64::from(input.height.max(1));
    if ctl.attach(Size::new(390.0, height)).is_err() {
        return;
    }

    for op in input.ops.iter().take(512) {
        match *op {
            Op::Sample {
                translation,
                velocity,
                phase,
            } => {
                let phase = match phase % 4 {
                    0 => GesturePhase::Began,
                    1 => GesturePhase::Changed,
                    2 => GesturePhase::Ended,
                    _ => GesturePhase::Cancelled,
                };
                let event = GestureEvent::new(
                    f64::from(translation),
                    f64::from(velocity) * 4.0,
                    phase,
                );
                let before = ctl.host().commands;
                ctl.process(&event).expect("attached controller accepts samples");
                assert!(ctl.host().commands - before <= 1);
            }
            Op::Finish => ctl.animation_finished(),
            Op::Resize { height } => {
                let height = f64::from(height.max(1));
                ctl.host_mut().height = height;
                ctl.resize(Size::new(390.0, height)).expect("positive size");
            }
        }
    }
});
