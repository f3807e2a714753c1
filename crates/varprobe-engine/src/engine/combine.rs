//! Navigation operations that extend a handle by one step.
//!
//! Each operation evaluates its base eagerly and performs the step once.
//! Copyable results come back as scalars; anything else comes back as a new
//! handle whose path re-derives the same value later.

use varprobe_core::{Handle, Kind, Lookup, RawNext, Scalar, Target, Value};

use super::error::{InspectError, Missing, Result};
use super::inspector::Inspector;
use super::marshal::{copy_out, has_representative};
use super::trace::Tracer;

/// Key of a lookup as it will be recorded in the new path.
enum KeyRef<'v> {
    Constant(Scalar),
    Object(&'v Handle),
}

impl KeyRef<'_> {
    fn on(&self, base: &Handle, lookup: Lookup) -> Handle {
        match (self, lookup) {
            (KeyRef::Constant(key), Lookup::Get) => base.index(key),
            (KeyRef::Constant(key), Lookup::Next) => base.next_key(key),
            (KeyRef::Object(key), lookup) => base.index_object(lookup, key),
        }
    }
}

impl<'t, T: Target, R: Tracer> Inspector<'t, T, R> {
    /// `base[key]`, without invoking any lookup override.
    ///
    /// A key absent from `base` is `NotFound`, as when a handle to it is
    /// evaluated later.
    pub fn index(&mut self, base: &Value, key: &Value) -> Result<Value> {
        self.index_live(base, key)
            .inspect_err(|e| self.tracer.trace_rejected("index", e))
    }

    fn index_live(&mut self, base: &Value, key: &Value) -> Result<Value> {
        if matches!(key, Value::Scalar(Scalar::Nil)) {
            return Err(InspectError::Unsupported("nil key"));
        }
        let table = self.resolve(base)?;
        let base = self.lazy_base(base, &table, "table", |k| k == Kind::Table)?;
        let (key_ref, key) = self.key(key)?;
        if matches!(key, KeyRef::Constant(Scalar::Nil)) {
            return Err(InspectError::Unsupported("nil key"));
        }

        self.reserve()?;
        let value = self.target.raw_get(&table, &key_ref);
        if self.target.kind(&value) == Kind::Nil {
            return Err(Missing::Key.into());
        }
        Ok(self.publish(&value, || key.on(base, Lookup::Get)))
    }

    /// The entry following `last` in `base`'s native order; `None` starts
    /// the iteration. `Ok(None)` once the entries are exhausted.
    pub fn next(&mut self, base: &Value, last: Option<&Value>) -> Result<Option<(Value, Value)>> {
        self.next_live(base, last)
            .inspect_err(|e| self.tracer.trace_rejected("next", e))
    }

    fn next_live(&mut self, base: &Value, last: Option<&Value>) -> Result<Option<(Value, Value)>> {
        let table = self.resolve(base)?;
        let base = self.lazy_base(base, &table, "table", |k| k == Kind::Table)?;
        let (last_ref, last) = match last {
            Some(last) => self.key(last)?,
            None => {
                self.reserve()?;
                (self.target.new_nil(), KeyRef::Constant(Scalar::Nil))
            }
        };

        self.reserve()?;
        let (next_key, next_value) = match self.target.raw_next(&table, &last_ref) {
            RawNext::Entry(key, value) => (key, value),
            RawNext::End => return Ok(None),
            RawNext::InvalidKey => return Err(Missing::Key.into()),
        };
        let key = self.publish(&next_key, || last.on(base, Lookup::Next));
        let value = self.publish(&next_value, || match &key {
            Value::Scalar(key) => base.index(key),
            Value::Handle(key) => base.index_object(Lookup::Get, key),
        });
        Ok(Some((key, value)))
    }

    /// Name and value of capture `index` (1-based) of a callable.
    pub fn upvalue(&mut self, base: &Value, index: u32) -> Result<(String, Value)> {
        self.upvalue_live(base, index)
            .inspect_err(|e| self.tracer.trace_rejected("upvalue", e))
    }

    fn upvalue_live(&mut self, base: &Value, index: u32) -> Result<(String, Value)> {
        let function = self.resolve(base)?;
        let base = self.lazy_base(base, &function, "function", |k| k == Kind::Function)?;

        self.reserve()?;
        let (name, value) = self
            .target
            .upvalue(&function, index)
            .ok_or(Missing::Upvalue(index))?;
        Ok((name, self.publish(&value, || base.upvalue(index))))
    }

    /// Handle to the metatable of `base`.
    ///
    /// Tables and opaque objects have their own; every other kind shares one
    /// metatable per kind.
    pub fn metatable(&mut self, base: &Value) -> Result<Handle> {
        self.metatable_live(base)
            .inspect_err(|e| self.tracer.trace_rejected("metatable", e))
    }

    fn metatable_live(&mut self, base: &Value) -> Result<Handle> {
        let live = self.resolve(base)?;
        let kind = self.target.kind(&live);
        let handle = if kind.has_own_metatable() {
            self.lazy_base(base, &live, "table or userdata", Kind::has_own_metatable)?
                .metatable()
        } else if has_representative(kind) {
            Handle::kind_metatable(kind)
        } else {
            return Err(InspectError::Unsupported("kind has no shared metatable"));
        };

        self.reserve()?;
        if self.target.metatable(&live).is_none() {
            return Err(Missing::Metatable.into());
        }
        self.tracer.trace_handle(&handle);
        Ok(handle)
    }

    /// Payload attached to an opaque object.
    pub fn user_payload(&mut self, base: &Value) -> Result<Value> {
        self.user_payload_live(base)
            .inspect_err(|e| self.tracer.trace_rejected("user_payload", e))
    }

    fn user_payload_live(&mut self, base: &Value) -> Result<Value> {
        let userdata = self.resolve(base)?;
        let base = self.lazy_base(base, &userdata, "userdata", |k| k == Kind::Userdata)?;

        self.reserve()?;
        let payload = self
            .target
            .user_payload(&userdata)
            .ok_or(Missing::Payload)?;
        Ok(self.publish(&payload, || base.user_payload()))
    }

    /// Check the kind of a resolved base and return the handle it came from.
    fn lazy_base<'v>(
        &self,
        base: &'v Value,
        live: &T::Ref,
        expected: &'static str,
        accepts: impl Fn(Kind) -> bool,
    ) -> Result<&'v Handle> {
        let found = self.target.kind(live);
        match base {
            Value::Handle(handle) if accepts(found) => Ok(handle),
            _ => Err(InspectError::TypeMismatch { expected, found }),
        }
    }

    /// Resolve a key and decide how the new path records it. Keys that
    /// resolve to copyable values are recorded as constants.
    fn key<'v>(&mut self, key: &'v Value) -> Result<(T::Ref, KeyRef<'v>)> {
        let live = self.resolve(key)?;
        let recorded = match key {
            Value::Scalar(scalar) => KeyRef::Constant(scalar.clone()),
            Value::Handle(handle) => match copy_out(self.target, &live) {
                Some(scalar) => KeyRef::Constant(scalar),
                None => KeyRef::Object(handle),
            },
        };
        Ok((live, recorded))
    }
}
