//! Call-frame accessors.

use varprobe_core::{Handle, Target, Value};

use super::error::{Missing, Result};
use super::inspector::Inspector;
use super::trace::Tracer;

impl<'t, T: Target, R: Tracer> Inspector<'t, T, R> {
    /// Name and value of local `slot` in the frame `frame` levels up.
    pub fn frame_local(&mut self, frame: u16, slot: u32) -> Result<(String, Value)> {
        self.frame_local_live(frame, slot)
            .inspect_err(|e| self.tracer.trace_rejected("frame_local", e))
    }

    fn frame_local_live(&mut self, frame: u16, slot: u32) -> Result<(String, Value)> {
        if !self.target.has_frame(frame) {
            return Err(Missing::Frame(frame).into());
        }
        self.reserve()?;
        let (name, value) = self
            .target
            .frame_local(frame, slot)
            .ok_or(Missing::Local { frame, slot })?;
        Ok((name, self.publish(&value, || Handle::frame_local(frame, slot))))
    }

    /// Handle to the callable running in frame `frame`.
    ///
    /// The handle stops resolving once that frame returns.
    pub fn frame_function(&mut self, frame: u16) -> Result<Handle> {
        self.frame_function_live(frame)
            .inspect_err(|e| self.tracer.trace_rejected("frame_function", e))
    }

    fn frame_function_live(&mut self, frame: u16) -> Result<Handle> {
        self.reserve()?;
        self.target
            .frame_function(frame)
            .ok_or(Missing::Frame(frame))?;
        let handle = Handle::frame_function(frame);
        self.tracer.trace_handle(&handle);
        Ok(handle)
    }
}
