use no_std_compat::cell::Cell;

use crate::bsp::output::Output;
use crate::edt::EDT;

/// Which of the three LEDs is lit, if any
#[derive(Clone, Debug, Eq, PartialEq, Copy)]
pub enum Led {
    Green,
    Amber,
    Red,
    Off,
}

impl Led {
    pub const ALL: [Led; 4] = [Led::Green, Led::Amber, Led::Red, Led::Off];

    pub fn label(self) -> &'static str {
        match self {
            Led::Green => "Green",
            Led::Amber => "Amber",
            Led::Red => "Red",
            Led::Off => "Off",
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Copy)]
pub enum Action {
    /// Step `step` of [CYCLE]; past the end the lights go off and `restore` comes back
    Cycle { step: usize, restore: Led },
}

/// The cycle sequence, each LED with the time it stays lit
pub const CYCLE: &'static [(Led, u32)] = &[(Led::Green, 2000), (Led::Amber, 1000), (Led::Red, 2000)];

pub const CYCLE_DURATION: u32 = cycle_duration(CYCLE);

const fn cycle_duration(steps: &[(Led, u32)]) -> u32 {
    let mut total = 0;
    let mut i = 0;
    while i < steps.len() {
        total += steps[i].1;
        i += 1;
    }
    total
}

#[derive(Copy, Clone)]
struct State {
    /// what the outputs show
    current: Led,
    /// what the user picked
    selected: Led,
    cycling: bool,
}

/// Drives three outputs so that at most one of them is high
pub struct TrafficLight<'a> {
    green: &'a dyn Output,
    amber: &'a dyn Output,
    red: &'a dyn Output,
    edt: &'a EDT<Action>,
    state: Cell<State>,
}

impl<'a> TrafficLight<'a> {
    pub fn new(
        green: &'a dyn Output,
        amber: &'a dyn Output,
        red: &'a dyn Output,
        edt: &'a EDT<Action>,
    ) -> Self {
        TrafficLight {
            green,
            amber,
            red,
            edt,
            state: Cell::new(State {
                current: Led::Off,
                selected: Led::Off,
                cycling: false,
            }),
        }
    }

    /// By default no LEDs are lit
    pub fn start(&self) {
        self.switch_led(Led::Off);
    }

    pub fn current(&self) -> Led {
        self.state.get().current
    }

    pub fn selected(&self) -> Led {
        self.state.get().selected
    }

    pub fn is_cycling(&self) -> bool {
        self.state.get().cycling
    }

    /// Lights the given LED. Ignored while cycling, returns false in that case.
    pub fn select(&self, led: Led) -> bool {
        if self.is_cycling() {
            return false;
        }
        self.state.set(State {
            selected: led,
            ..self.state.get()
        });
        self.switch_led(led);
        true
    }

    /// Starts green, amber, red, off and then restores the current LED
    pub fn cycle(&self) -> bool {
        if self.is_cycling() {
            return false;
        }
        let restore = self.current();
        self.state.set(State {
            cycling: true,
            ..self.state.get()
        });
        self.continue_cycle(0, restore);
        true
    }

    pub fn process_message(&self, action: Action) {
        match action {
            Action::Cycle { step, restore } => self.continue_cycle(step, restore),
        }
    }

    /// Cancels a running cycle and switches everything off
    pub fn cleanup(&self) {
        self.edt.remove(|action| match action {
            Action::Cycle { .. } => true,
        });
        self.state.set(State {
            current: Led::Off,
            selected: Led::Off,
            cycling: false,
        });
        self.switch_led(Led::Off);
    }

    fn continue_cycle(&self, step: usize, restore: Led) {
        if let Some((led, duration)) = CYCLE.get(step) {
            self.switch_led(*led);
            self.edt.schedule(
                *duration,
                Action::Cycle {
                    step: step + 1,
                    restore,
                },
            );
        } else {
            self.switch_led(Led::Off);
            self.state.set(State {
                cycling: false,
                ..self.state.get()
            });
            self.switch_led(restore);
        }
    }

    /// Switches the specified LED on and all others off (or all off)
    fn switch_led(&self, led: Led) {
        let outputs = [
            (Led::Green, self.green),
            (Led::Amber, self.amber),
            (Led::Red, self.red),
        ];
        // lower first, two LEDs are never lit together
        for (color, output) in outputs.iter() {
            if *color != led {
                output.set(false);
            }
        }
        for (color, output) in outputs.iter() {
            if *color == led {
                output.set(true);
            }
        }
        self.state.set(State {
            current: led,
            ..self.state.get()
        });
    }
}
