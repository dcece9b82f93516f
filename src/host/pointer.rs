//! System pointer through `enigo`.

use enigo::{Button, Coordinate, Direction as Press, Enigo, Mouse, Settings};

use crate::error::{NinError, NinResult};
use crate::nin::PointerDriver;

pub struct EnigoPointer {
    enigo: Enigo,
}

impl EnigoPointer {
    pub fn new() -> NinResult<Self> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| NinError::PointerError(format!("failed to connect: {}", e)))?;
        Ok(Self { enigo })
    }
}

impl PointerDriver for EnigoPointer {
    fn move_by(&mut self, dx: i32, dy: i32) -> NinResult<()> {
        self.enigo
            .move_mouse(dx, dy, Coordinate::Rel)
            .map_err(|e| NinError::PointerError(e.to_string()))
    }

    fn click(&mut self) -> NinResult<()> {
        self.enigo
            .button(Button::Left, Press::Click)
            .map_err(|e| NinError::PointerError(e.to_string()))
    }
}

/// Stand-in when the input backend cannot be opened; every call reports why.
pub struct UnavailablePointer(pub String);

impl PointerDriver for UnavailablePointer {
    fn move_by(&mut self, _dx: i32, _dy: i32) -> NinResult<()> {
        Err(NinError::PointerError(self.0.clone()))
    }

    fn click(&mut self) -> NinResult<()> {
        Err(NinError::PointerError(self.0.clone()))
    }
}
