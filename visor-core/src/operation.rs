//! Operations: what callers ask the display to do
//!
//! An [`Operation`] expands into a short, fixed list of [`Command`]s that
//! the pipeline writes back to back. The operation succeeds only if every
//! fragment of every command is acknowledged.

use heapless::{String, Vec};
use visor_layout::{Layout, Point, Screen, Widget};
use visor_protocol::command::{Command, CommandError, LedState, TextArg};

/// Longest command list of a single operation
pub const MAX_OPERATION_COMMANDS: usize = 4;

/// Brightest luminosity level
pub const MAX_BRIGHTNESS: u8 = 15;

/// Longest caller/sender/label shown by a notification screen
pub const MAX_NOTIFY_TEXT: usize = 32;

/// Commands of one operation
pub type Commands = Vec<Command, MAX_OPERATION_COMMANDS>;

/// Text shown by a notification screen
pub type NotifyText = String<MAX_NOTIFY_TEXT>;

/// Device-resident notification screens
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Notify {
    Call { caller: NotifyText },
    Message { sender: NotifyText },
    Alarm { label: NotifyText },
}

impl Notify {
    pub fn call(caller: &str) -> Self {
        Notify::Call {
            caller: sanitize(caller),
        }
    }

    pub fn message(sender: &str) -> Self {
        Notify::Message {
            sender: sanitize(sender),
        }
    }

    pub fn alarm(label: &str) -> Self {
        Notify::Alarm {
            label: sanitize(label),
        }
    }

    /// System layout showing this notification
    pub fn layout_id(&self) -> u8 {
        match self {
            Notify::Call { .. } => 1,
            Notify::Message { .. } => 2,
            Notify::Alarm { .. } => 3,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Notify::Call { caller } => caller,
            Notify::Message { sender } => sender,
            Notify::Alarm { label } => label,
        }
    }
}

/// Replace characters the device cannot show and cut to capacity
fn sanitize(text: &str) -> NotifyText {
    let mut out = NotifyText::new();
    for c in text.chars() {
        let c = if c.is_ascii() && !c.is_ascii_control() { c } else { '?' };
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// A unit of work for the display
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Operation {
    /// Wake and clear the display
    Hello,
    /// Clear and power down the display
    Shutdown,
    /// Ask for a battery report (arrives as a notification)
    GetBattery,
    ClearScreen,
    SetLed(LedState),
    SetBrightness { level: u8, auto_adjust: bool },
    /// Upload a user screen
    AddScreen(Screen),
    /// Upload a raw layout
    SaveLayout(Layout),
    /// Show a stored screen or layout with the given text
    ShowScreen { id: u8, text: TextArg },
    /// Draw a widget immediately
    Draw(Widget),
    Notify(Notify),
}

/// Operation discriminant reported with results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OperationKind {
    Hello,
    Shutdown,
    GetBattery,
    ClearScreen,
    SetLed,
    SetBrightness,
    AddScreen,
    SaveLayout,
    ShowScreen,
    Draw,
    Notify,
}

impl Operation {
    /// Brightness with the level clamped to 0-15
    pub fn set_brightness(level: u8, auto_adjust: bool) -> Self {
        Operation::SetBrightness {
            level: level.min(MAX_BRIGHTNESS),
            auto_adjust,
        }
    }

    pub fn show_screen(id: u8, text: &str) -> Result<Self, CommandError> {
        Ok(Operation::ShowScreen {
            id,
            text: Command::text_arg(text)?,
        })
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Hello => OperationKind::Hello,
            Operation::Shutdown => OperationKind::Shutdown,
            Operation::GetBattery => OperationKind::GetBattery,
            Operation::ClearScreen => OperationKind::ClearScreen,
            Operation::SetLed(_) => OperationKind::SetLed,
            Operation::SetBrightness { .. } => OperationKind::SetBrightness,
            Operation::AddScreen(_) => OperationKind::AddScreen,
            Operation::SaveLayout(_) => OperationKind::SaveLayout,
            Operation::ShowScreen { .. } => OperationKind::ShowScreen,
            Operation::Draw(_) => OperationKind::Draw,
            Operation::Notify(_) => OperationKind::Notify,
        }
    }

    /// Expand into the commands to write, in order
    pub fn commands(&self) -> Result<Commands, CommandError> {
        let mut commands = Commands::new();
        match self {
            Operation::Hello => {
                push(&mut commands, Command::PowerOn)?;
                push(&mut commands, Command::Clear)?;
            }
            Operation::Shutdown => {
                push(&mut commands, Command::Clear)?;
                push(&mut commands, Command::PowerOff)?;
            }
            Operation::GetBattery => push(&mut commands, Command::Battery)?,
            Operation::ClearScreen => push(&mut commands, Command::Clear)?,
            Operation::SetLed(state) => push(&mut commands, Command::Led(*state))?,
            Operation::SetBrightness { level, auto_adjust } => {
                push(&mut commands, Command::Luma((*level).min(MAX_BRIGHTNESS)))?;
                push(&mut commands, Command::Sensor(*auto_adjust))?;
            }
            Operation::AddScreen(screen) => {
                push(&mut commands, screen.to_layout().save_command()?)?
            }
            Operation::SaveLayout(layout) => push(&mut commands, layout.save_command()?)?,
            Operation::ShowScreen { id, text } => push(
                &mut commands,
                Command::ShowLayout {
                    id: *id,
                    text: text.clone(),
                },
            )?,
            Operation::Draw(widget) => {
                for command in widget.draw_commands(Point::origin())? {
                    push(&mut commands, command)?;
                }
            }
            Operation::Notify(notify) => {
                push(&mut commands, Command::Led(LedState::Blink))?;
                push(
                    &mut commands,
                    Command::ShowLayout {
                        id: notify.layout_id(),
                        text: Command::text_arg(notify.text())?,
                    },
                )?;
            }
        }
        Ok(commands)
    }
}

fn push(commands: &mut Commands, command: Command) -> Result<(), CommandError> {
    commands.push(command).map_err(|_| CommandError::TooLong)
}

#[cfg(test)]
mod tests {
    use super::*;
    use visor_layout::{Color, Font};

    fn rendered(op: &Operation) -> std::vec::Vec<std::string::String> {
        op.commands()
            .unwrap()
            .iter()
            .map(|c| c.render().unwrap().as_str().into())
            .collect()
    }

    #[test]
    fn test_simple_operations() {
        assert_eq!(rendered(&Operation::Hello), ["power on", "clear"]);
        assert_eq!(rendered(&Operation::Shutdown), ["clear", "power off"]);
        assert_eq!(rendered(&Operation::GetBattery), ["battery"]);
        assert_eq!(rendered(&Operation::ClearScreen), ["clear"]);
        assert_eq!(rendered(&Operation::SetLed(LedState::On)), ["led on"]);
    }

    #[test]
    fn test_brightness_is_clamped() {
        let op = Operation::set_brightness(40, true);
        assert_eq!(rendered(&op), ["luma 15", "sensor on"]);

        // Built directly, the level is still clamped on the wire
        let op = Operation::SetBrightness {
            level: 99,
            auto_adjust: false,
        };
        assert_eq!(rendered(&op), ["luma 15", "sensor off"]);
    }

    #[test]
    fn test_add_screen_uploads_layout() {
        let screen = Screen::builder(10)
            .widget(Widget::text(
                15,
                16,
                "Test",
                Font::Small,
                Color::parse("#151413").unwrap(),
            ))
            .build();
        assert_eq!(
            rendered(&Operation::AddScreen(screen)),
            ["savelayout 0x0a0d012fff0000000f000101012fff040103010401090120ef0454657374"]
        );
    }

    #[test]
    fn test_show_screen() {
        let op = Operation::show_screen(12, "88 bpm").unwrap();
        assert_eq!(op.kind(), OperationKind::ShowScreen);
        assert_eq!(rendered(&op), ["layout 12 88 bpm"]);
        assert_eq!(
            Operation::show_screen(12, "a\nb"),
            Err(CommandError::InvalidText)
        );
    }

    #[test]
    fn test_draw_widget() {
        let op = Operation::Draw(Widget::circle(10, 10, 4, false).with_color(Color::new(3)));
        assert_eq!(rendered(&op), ["color 3", "circ 293 245 4"]);
    }

    #[test]
    fn test_notify() {
        let op = Operation::Notify(Notify::call("Ada Lovelace"));
        assert_eq!(rendered(&op), ["led blink", "layout 1 Ada Lovelace"]);

        let op = Operation::Notify(Notify::alarm("wake\u{1F600}"));
        assert_eq!(rendered(&op), ["led blink", "layout 3 wake?"]);
        assert_eq!(Notify::message("x").layout_id(), 2);
    }

    #[test]
    fn test_every_operation_fits_command_list() {
        let ops = [
            Operation::Hello,
            Operation::Shutdown,
            Operation::set_brightness(3, false),
            Operation::Draw(Widget::text(0, 0, "hi", Font::Large, Color::WHITE)),
            Operation::Notify(Notify::message("Bob")),
        ];
        for op in &ops {
            assert!(op.commands().unwrap().len() <= MAX_OPERATION_COMMANDS);
        }
    }
}
