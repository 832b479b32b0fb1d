// chatsync/chatsync-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

pub use image_file::ImageFile;
pub use transport_capabilities::TransportCapabilities;
pub use transport_error::TransportError;
pub use transport_event::TransportEvent;

mod image_file;
mod transport_capabilities;
mod transport_error;
mod transport_event;
