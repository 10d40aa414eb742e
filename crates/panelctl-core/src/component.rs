use crate::command::Command;
use ratatui::{layout::Rect, Frame};

/// A reusable sub-model that renders into a given [`Rect`] area.
///
/// `Component` is nearly identical to [`Model`](crate::Model) but its
/// [`view`](Component::view) method receives an `area: Rect`, so a parent
/// decides *where* each child renders by handing it a sub-region of the frame.
///
/// Components report changes upward by returning a command that carries one
/// of their own messages (for example `Changed(value)`). This is how a parent
/// observes a child: it routes the child's command through
/// [`Command::map`], turning the child's notification into a parent message.
///
/// # Composition pattern
///
/// ```rust,ignore
/// use panelctl_core::{Model, Component, Command};
/// use panelctl_widgets::control_group::{self, ControlGroup};
/// use ratatui::Frame;
///
/// struct App { gain: ControlGroup }
///
/// #[derive(Debug)]
/// enum AppMsg { Gain(control_group::Message) }
///
/// impl Model for App {
///     type Message = AppMsg;
///     type Flags = ();
///
///     fn init(_: ()) -> (Self, Command<AppMsg>) {
///         let gain = ControlGroup::new("Gain", 0.0, 10.0, 1.0, 5.0).unwrap();
///         (App { gain }, Command::none())
///     }
///
///     fn update(&mut self, msg: AppMsg) -> Command<AppMsg> {
///         match msg {
///             AppMsg::Gain(m) => self.gain.update(m).map(AppMsg::Gain),
///         }
///     }
///
///     fn view(&self, frame: &mut Frame) {
///         self.gain.view(frame, frame.area());
///     }
/// }
/// ```
pub trait Component: Send + 'static {
    /// The component's internal message type.
    ///
    /// Parent models typically wrap this in one of their own message variants
    /// so that events can be routed to the correct child.
    type Message: Send + 'static;

    /// Process a message, mutate state, and return a [`Command`] for side effects.
    ///
    /// The returned command uses the component's own `Message` type; the
    /// parent should call [`.map()`](Command::map) to lift it into the parent
    /// message type.
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;

    /// Render into a specific `area` of the [`Frame`].
    ///
    /// Implementations should confine all rendering to the given rectangle.
    fn view(&self, frame: &mut Frame, area: Rect);

    /// Whether this component currently has focus.
    ///
    /// A parent can query `focused()` to decide which child should receive
    /// keyboard events. The default implementation returns `false`.
    fn focused(&self) -> bool {
        false
    }
}
