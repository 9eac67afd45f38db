mod attendance;
mod class;
mod class_session;
mod enrollment;
mod event;
mod notification;
mod user;

#[allow(unused)]
pub use attendance::*;
#[allow(unused)]
pub use class::*;
#[allow(unused)]
pub use class_session::*;
#[allow(unused)]
pub use enrollment::*;
#[allow(unused)]
pub use event::*;
#[allow(unused)]
pub use notification::*;
#[allow(unused)]
pub use user::*;
