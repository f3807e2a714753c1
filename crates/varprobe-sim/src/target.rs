//! The sim heap and its [`Target`] implementation.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use indexmap::IndexMap;
use varprobe_core::{Callable, Kind, RawNext, Target};

use crate::pin::Pin;
use crate::value::{ObjId, SimValue, TableKey};

/// Working-area slots available by default.
pub const DEFAULT_CAPACITY: usize = 1_000_000;

/// Registry slot holding the main thread.
const REGISTRY_MAIN_THREAD: i64 = 1;
/// Registry slot holding the globals table.
const REGISTRY_GLOBALS: i64 = 2;

/// Live value handed out to the evaluator.
#[derive(Clone, Debug)]
pub struct SimRef {
    value: SimValue,
    _pin: Pin,
}

impl SimRef {
    pub fn value(&self) -> &SimValue {
        &self.value
    }
}

#[derive(Debug)]
enum Object {
    Table(Table),
    Function(Function),
    Userdata(Userdata),
    Thread,
}

#[derive(Debug, Default)]
struct Table {
    entries: IndexMap<TableKey, SimValue>,
    metatable: Option<ObjId>,
}

#[derive(Debug)]
enum Body {
    Native {
        address: usize,
    },
    Script {
        source: String,
        line_defined: i64,
        last_line_defined: i64,
    },
}

#[derive(Debug)]
struct Function {
    body: Body,
    upvalues: Vec<(String, SimValue)>,
}

#[derive(Debug)]
struct Userdata {
    payload: Option<SimValue>,
    metatable: Option<ObjId>,
}

#[derive(Debug)]
struct Frame {
    function: ObjId,
    locals: Vec<(String, SimValue)>,
}

/// A target interpreter instance living in the same process.
///
/// Frame level 0 is the most recently pushed frame. Local and upvalue
/// indices are 1-based.
#[derive(Debug)]
pub struct SimTarget {
    heap: Vec<Object>,
    globals: ObjId,
    registry: ObjId,
    main_thread: ObjId,
    kind_metatables: HashMap<Kind, ObjId>,
    frames: Vec<Frame>,
    status: i32,
    live: Rc<Cell<usize>>,
    capacity: usize,
}

impl Default for SimTarget {
    fn default() -> Self {
        Self::new()
    }
}

impl SimTarget {
    pub fn new() -> Self {
        let mut target = Self {
            heap: Vec::new(),
            globals: ObjId(0),
            registry: ObjId(0),
            main_thread: ObjId(0),
            kind_metatables: HashMap::new(),
            frames: Vec::new(),
            status: 0,
            live: Rc::new(Cell::new(0)),
            capacity: DEFAULT_CAPACITY,
        };
        target.registry = target.alloc(Object::Table(Table::default()));
        target.globals = target.alloc(Object::Table(Table::default()));
        target.main_thread = target.alloc(Object::Thread);

        let registry = SimValue::Object(target.registry);
        target.set(
            &registry,
            REGISTRY_MAIN_THREAD,
            SimValue::Object(target.main_thread),
        );
        target.set(&registry, REGISTRY_GLOBALS, SimValue::Object(target.globals));
        target
    }

    /// Limit the working area to `capacity` live refs.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
    }

    /// Refs currently alive in the working area.
    pub fn live_refs(&self) -> usize {
        self.live.get()
    }

    pub fn globals_table(&self) -> SimValue {
        SimValue::Object(self.globals)
    }

    pub fn registry_table(&self) -> SimValue {
        SimValue::Object(self.registry)
    }

    pub fn main_thread_value(&self) -> SimValue {
        SimValue::Object(self.main_thread)
    }

    pub fn new_table(&mut self) -> SimValue {
        SimValue::Object(self.alloc(Object::Table(Table::default())))
    }

    /// Raw assignment. A nil value removes the key.
    pub fn set(
        &mut self,
        table: &SimValue,
        key: impl Into<SimValue>,
        value: impl Into<SimValue>,
    ) {
        let key = TableKey::from_value(&key.into()).expect("nil or NaN table key");
        let value = value.into();
        let table = self.table_mut(table).expect("set on a non-table");
        if value.is_nil() {
            table.entries.shift_remove(&key);
        } else {
            table.entries.insert(key, value);
        }
    }

    /// Raw read. Absent keys read as nil.
    pub fn get(&self, table: &SimValue, key: impl Into<SimValue>) -> SimValue {
        let key = key.into();
        match (self.table(table), TableKey::from_value(&key)) {
            (Some(table), Some(key)) => table.entries.get(&key).cloned().unwrap_or(SimValue::Nil),
            _ => SimValue::Nil,
        }
    }

    pub fn set_global(&mut self, name: &str, value: impl Into<SimValue>) {
        let globals = self.globals_table();
        self.set(&globals, name, value);
    }

    pub fn new_native(&mut self, address: usize) -> SimValue {
        SimValue::Object(self.alloc(Object::Function(Function {
            body: Body::Native { address },
            upvalues: Vec::new(),
        })))
    }

    pub fn new_closure(
        &mut self,
        source: &str,
        lines: (i64, i64),
        upvalues: Vec<(&str, SimValue)>,
    ) -> SimValue {
        SimValue::Object(self.alloc(Object::Function(Function {
            body: Body::Script {
                source: source.to_string(),
                line_defined: lines.0,
                last_line_defined: lines.1,
            },
            upvalues: upvalues
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
        })))
    }

    /// Replace capture `index` (1-based) of a closure.
    pub fn set_upvalue(&mut self, function: &SimValue, index: u32, value: impl Into<SimValue>) {
        let SimValue::Object(id) = function else {
            panic!("set_upvalue on a non-function");
        };
        let Object::Function(f) = &mut self.heap[id.0 as usize] else {
            panic!("set_upvalue on a non-function");
        };
        f.upvalues[index as usize - 1].1 = value.into();
    }

    pub fn new_userdata(&mut self, payload: Option<SimValue>) -> SimValue {
        SimValue::Object(self.alloc(Object::Userdata(Userdata {
            payload,
            metatable: None,
        })))
    }

    pub fn new_thread(&mut self) -> SimValue {
        SimValue::Object(self.alloc(Object::Thread))
    }

    /// Set the metatable of a table or opaque object, or the shared
    /// metatable of every value of another kind.
    pub fn set_metatable(&mut self, value: &SimValue, metatable: Option<&SimValue>) {
        let metatable = metatable.map(|mt| match mt {
            SimValue::Object(id) if matches!(self.heap[id.0 as usize], Object::Table(_)) => *id,
            _ => panic!("metatable must be a table"),
        });
        let kind = self.kind_of(value);
        match (value, metatable) {
            (SimValue::Object(id), _) if kind.has_own_metatable() => {
                match &mut self.heap[id.0 as usize] {
                    Object::Table(t) => t.metatable = metatable,
                    Object::Userdata(u) => u.metatable = metatable,
                    _ => unreachable!("{kind} has no own metatable"),
                }
            }
            (_, Some(mt)) => {
                self.kind_metatables.insert(kind, mt);
            }
            (_, None) => {
                self.kind_metatables.remove(&kind);
            }
        }
    }

    /// Enter a call. The new frame becomes level 0.
    pub fn push_frame(&mut self, function: &SimValue, locals: Vec<(&str, SimValue)>) {
        let SimValue::Object(id) = function else {
            panic!("frame function must be an object");
        };
        self.frames.push(Frame {
            function: *id,
            locals: locals
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
        });
    }

    /// Return from the innermost call.
    pub fn pop_frame(&mut self) {
        self.frames.pop().expect("pop on empty call stack");
    }

    /// Assign local `slot` (1-based) of frame `level`.
    pub fn set_local(&mut self, level: u16, slot: u32, value: impl Into<SimValue>) {
        let at = self.frames.len() - 1 - level as usize;
        self.frames[at].locals[slot as usize - 1].1 = value.into();
    }

    pub fn set_status(&mut self, status: i32) {
        self.status = status;
    }

    fn alloc(&mut self, object: Object) -> ObjId {
        let id = ObjId(u32::try_from(self.heap.len()).expect("sim heap exhausted"));
        self.heap.push(object);
        id
    }

    fn object(&self, value: &SimValue) -> Option<&Object> {
        match value {
            SimValue::Object(id) => self.heap.get(id.0 as usize),
            _ => None,
        }
    }

    fn table(&self, value: &SimValue) -> Option<&Table> {
        match self.object(value)? {
            Object::Table(t) => Some(t),
            _ => None,
        }
    }

    fn table_mut(&mut self, value: &SimValue) -> Option<&mut Table> {
        let SimValue::Object(id) = value else {
            return None;
        };
        match self.heap.get_mut(id.0 as usize)? {
            Object::Table(t) => Some(t),
            _ => None,
        }
    }

    fn function(&self, value: &SimValue) -> Option<&Function> {
        match self.object(value)? {
            Object::Function(f) => Some(f),
            _ => None,
        }
    }

    fn frame(&self, level: u16) -> Option<&Frame> {
        let at = self.frames.len().checked_sub(1 + level as usize)?;
        self.frames.get(at)
    }

    fn kind_of(&self, value: &SimValue) -> Kind {
        match value {
            SimValue::Nil => Kind::Nil,
            SimValue::Boolean(_) => Kind::Boolean,
            SimValue::Integer(_) | SimValue::Float(_) => Kind::Number,
            SimValue::String(_) => Kind::String,
            SimValue::Pointer(_) => Kind::Pointer,
            SimValue::Object(id) => match &self.heap[id.0 as usize] {
                Object::Table(_) => Kind::Table,
                Object::Function(_) => Kind::Function,
                Object::Userdata(_) => Kind::Userdata,
                Object::Thread => Kind::Thread,
            },
        }
    }

    /// Pin `value` in the working area.
    pub fn pin(&self, value: SimValue) -> SimRef {
        SimRef {
            value,
            _pin: Pin::new(&self.live),
        }
    }
}

/// Fake but stable address for heap objects.
fn object_address(id: ObjId) -> usize {
    0x10_0000 + id.0 as usize * 0x40
}

impl Target for SimTarget {
    type Ref = SimRef;

    fn reserve(&mut self, slots: usize) -> bool {
        self.live.get() + slots <= self.capacity
    }

    fn kind(&self, value: &SimRef) -> Kind {
        self.kind_of(&value.value)
    }

    fn identity(&self, value: &SimRef) -> usize {
        match &value.value {
            SimValue::Object(id) => object_address(*id),
            SimValue::String(s) => s.as_ptr() as usize,
            SimValue::Pointer(p) => *p,
            _ => 0,
        }
    }

    fn to_boolean(&self, value: &SimRef) -> bool {
        !matches!(value.value, SimValue::Nil | SimValue::Boolean(false))
    }

    fn to_integer(&self, value: &SimRef) -> Option<i64> {
        match value.value {
            SimValue::Integer(i) => Some(i),
            _ => None,
        }
    }

    fn to_float(&self, value: &SimRef) -> f64 {
        match value.value {
            SimValue::Integer(i) => i as f64,
            SimValue::Float(n) => n,
            _ => 0.0,
        }
    }

    fn to_bytes(&self, value: &SimRef) -> Vec<u8> {
        match &value.value {
            SimValue::String(s) => s.to_vec(),
            _ => Vec::new(),
        }
    }

    fn to_pointer(&self, value: &SimRef) -> usize {
        self.identity(value)
    }

    fn new_nil(&mut self) -> SimRef {
        self.pin(SimValue::Nil)
    }

    fn new_boolean(&mut self, b: bool) -> SimRef {
        self.pin(SimValue::Boolean(b))
    }

    fn new_integer(&mut self, i: i64) -> SimRef {
        self.pin(SimValue::Integer(i))
    }

    fn new_float(&mut self, n: f64) -> SimRef {
        self.pin(SimValue::Float(n))
    }

    fn new_string(&mut self, bytes: &[u8]) -> SimRef {
        self.pin(SimValue::String(Rc::from(bytes)))
    }

    fn new_pointer(&mut self, p: usize) -> SimRef {
        self.pin(SimValue::Pointer(p))
    }

    fn globals(&mut self) -> SimRef {
        self.pin(SimValue::Object(self.globals))
    }

    fn registry(&mut self) -> SimRef {
        self.pin(SimValue::Object(self.registry))
    }

    fn main_thread(&mut self) -> SimRef {
        self.pin(SimValue::Object(self.main_thread))
    }

    fn has_frame(&self, level: u16) -> bool {
        self.frame(level).is_some()
    }

    fn frame_local(&mut self, level: u16, slot: u32) -> Option<(String, SimRef)> {
        let index = slot.checked_sub(1)? as usize;
        let (name, value) = self.frame(level)?.locals.get(index)?.clone();
        Some((name, self.pin(value)))
    }

    fn frame_function(&mut self, level: u16) -> Option<SimRef> {
        let id = self.frame(level)?.function;
        Some(self.pin(SimValue::Object(id)))
    }

    fn raw_get(&mut self, table: &SimRef, key: &SimRef) -> SimRef {
        let value = match (self.table(&table.value), TableKey::from_value(&key.value)) {
            (Some(t), Some(key)) => t.entries.get(&key).cloned().unwrap_or(SimValue::Nil),
            _ => SimValue::Nil,
        };
        self.pin(value)
    }

    fn raw_next(&mut self, table: &SimRef, key: &SimRef) -> RawNext<SimRef> {
        let Some(t) = self.table(&table.value) else {
            return RawNext::InvalidKey;
        };
        let position = if key.value.is_nil() {
            0
        } else {
            match TableKey::from_value(&key.value).and_then(|k| t.entries.get_index_of(&k)) {
                Some(i) => i + 1,
                None => return RawNext::InvalidKey,
            }
        };
        match t.entries.get_index(position) {
            Some((k, v)) => {
                let (k, v) = (k.to_value(), v.clone());
                RawNext::Entry(self.pin(k), self.pin(v))
            }
            None => RawNext::End,
        }
    }

    fn upvalue(&mut self, function: &SimRef, index: u32) -> Option<(String, SimRef)> {
        let at = index.checked_sub(1)? as usize;
        let (name, value) = self.function(&function.value)?.upvalues.get(at)?.clone();
        Some((name, self.pin(value)))
    }

    fn metatable(&mut self, value: &SimRef) -> Option<SimRef> {
        let id = match self.object(&value.value) {
            Some(Object::Table(t)) => t.metatable,
            Some(Object::Userdata(u)) => u.metatable,
            _ => self
                .kind_metatables
                .get(&self.kind_of(&value.value))
                .copied(),
        }?;
        Some(self.pin(SimValue::Object(id)))
    }

    fn user_payload(&mut self, userdata: &SimRef) -> Option<SimRef> {
        match self.object(&userdata.value) {
            Some(Object::Userdata(u)) => {
                let payload = u.payload.clone()?;
                Some(self.pin(payload))
            }
            _ => None,
        }
    }

    fn callable(&self, function: &SimRef) -> Option<Callable> {
        let f = self.function(&function.value)?;
        Some(match &f.body {
            Body::Native { address } => Callable::Native { address: *address },
            Body::Script {
                source,
                line_defined,
                last_line_defined,
            } => Callable::Script {
                source: source.clone(),
                line_defined: *line_defined,
                last_line_defined: *last_line_defined,
            },
        })
    }

    fn status(&self) -> i32 {
        self.status
    }
}
