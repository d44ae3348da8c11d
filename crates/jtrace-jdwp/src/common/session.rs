use std::collections::HashMap;
use std::time::Duration;

use jtrace_tracer::debugger::{
    BatchWait, DebugEvent, DebugSession, EventBatch, MethodName, SuspendPolicy,
};

use tokio::net::tcp::OwnedWriteHalf;
use tokio::process::Child;

use super::connection::Connection;
use crate::protocol::{
    Composite, JdwpEvent, Location, Value, WireReader, WireWriter, command, command_set,
    event_kind, modifier, signature_to_name, step, suspend_policy, tag,
};
use crate::{Error, Result};

/// JDWP error code of a method without line number information.
const ABSENT_INFORMATION: u16 = 101;

/// JDWP error code of a native method.
const NATIVE_METHOD: u16 = 511;

/// Thread of a JDWP debuggee.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ThreadRef(pub u64);

/// Class prepared by a JDWP debuggee.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassRef {
    /// Kind of reference type (class, interface or array).
    pub type_tag: u8,

    /// Reference type ID.
    pub id: u64,

    /// Java name of the class.
    pub name: String,
}

/// Field declared by a class.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldRef {
    /// Reference type ID of the declaring class.
    pub class: u64,

    /// Field ID.
    pub id: u64,

    /// Name of the field.
    pub name: String,
}

/// Event request registered in a JDWP debuggee.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RequestId {
    kind: u8,
    id: i32,
}

/// Handle releasing what the delivery of an event batch suspended.
#[derive(Debug)]
pub struct Release {
    policy: SuspendPolicy,
    thread: Option<u64>,
}

enum Modifier<'a> {
    Count(i32),
    ClassExclude(&'a str),
    ExceptionOnly { caught: bool, uncaught: bool },
    FieldOnly { class: u64, field: u64 },
    Step { thread: u64, size: i32, depth: i32 },
}

impl Modifier<'_> {
    fn encode(&self, w: &mut WireWriter<'_>) {
        match *self {
            Self::Count(count) => {
                w.u8(modifier::COUNT).i32(count);
            }
            Self::ClassExclude(pattern) => {
                w.u8(modifier::CLASS_EXCLUDE).string(pattern);
            }
            Self::ExceptionOnly { caught, uncaught } => {
                // a null reference type means every exception
                w.u8(modifier::EXCEPTION_ONLY)
                    .reference_type_id(0)
                    .bool(caught)
                    .bool(uncaught);
            }
            Self::FieldOnly { class, field } => {
                w.u8(modifier::FIELD_ONLY)
                    .reference_type_id(class)
                    .field_id(field);
            }
            Self::Step {
                thread,
                size,
                depth,
            } => {
                w.u8(modifier::STEP).object_id(thread).i32(size).i32(depth);
            }
        }
    }
}

/// Debug session over a JDWP connection.
pub struct JdwpSession {
    conn: Connection<OwnedWriteHalf>,

    /// How long a single wait for an event batch lasts.
    wait_interval: Duration,

    /// Java names of the reference types.
    types: HashMap<u64, String>,

    /// Method names, per reference type.
    methods: HashMap<u64, HashMap<u64, String>>,

    /// Field names, per reference type.
    fields: HashMap<u64, Vec<FieldRef>>,

    /// Line tables (code index, line number), per method.
    lines: HashMap<(u64, u64), Vec<(u64, i32)>>,

    /// Debuggee process, if it was launched by this session.
    launched: Option<Child>,
}

impl JdwpSession {
    pub(crate) fn new(
        conn: Connection<OwnedWriteHalf>,
        wait_interval: Duration,
        launched: Option<Child>,
    ) -> Self {
        Self {
            conn,
            wait_interval,
            types: HashMap::new(),
            methods: HashMap::new(),
            fields: HashMap::new(),
            lines: HashMap::new(),
            launched,
        }
    }

    fn log_launched_exit(&mut self) {
        let Some(child) = self.launched.as_mut() else {
            return;
        };

        match child.try_wait() {
            Ok(Some(status)) => tracing::info!(%status, "launched debuggee exited"),
            Ok(None) => tracing::debug!(pid = child.id(), "launched debuggee still running"),
            Err(e) => tracing::warn!(error = %e, "failed to query the launched debuggee"),
        }
    }

    async fn translate(&mut self, event: JdwpEvent) -> Result<DebugEvent<Self>> {
        let event = match event {
            JdwpEvent::VmStart { .. } => DebugEvent::SessionStarted,
            JdwpEvent::VmDeath => DebugEvent::SessionExited,
            JdwpEvent::SingleStep { request, thread } => DebugEvent::StepCompleted {
                thread: ThreadRef(thread),
                request: RequestId {
                    kind: event_kind::SINGLE_STEP,
                    id: request,
                },
            },
            JdwpEvent::MethodEntry { thread, location } => DebugEvent::MethodEntered {
                thread: ThreadRef(thread),
                method: self.method_name(&location).await?,
            },
            JdwpEvent::MethodExit { thread, location } => DebugEvent::MethodExited {
                thread: ThreadRef(thread),
                method: self.method_name(&location).await?,
            },
            JdwpEvent::Exception {
                thread,
                exception,
                catch_location,
            } => {
                let exception = self.render_object(exception).await?;

                let catch_location = match catch_location {
                    Some(location) => Some(self.render_location(&location).await?),
                    None => None,
                };

                DebugEvent::ExceptionThrown {
                    thread: ThreadRef(thread),
                    exception,
                    catch_location,
                }
            }
            JdwpEvent::ThreadDeath { thread } => DebugEvent::ThreadDied {
                thread: ThreadRef(thread),
            },
            JdwpEvent::ClassPrepare {
                type_tag,
                type_id,
                signature,
                ..
            } => {
                let name = signature_to_name(&signature);
                self.types.insert(type_id, name.clone());

                DebugEvent::ClassLoaded {
                    class: ClassRef {
                        type_tag,
                        id: type_id,
                        name,
                    },
                }
            }
            JdwpEvent::FieldModification {
                thread,
                type_id,
                field,
                value,
            } => DebugEvent::FieldModified {
                thread: ThreadRef(thread),
                field: self.field_name(type_id, field).await?,
                value: self.render_value(value).await?,
            },
        };

        Ok(event)
    }

    /// Returns the Java name of a reference type.
    async fn type_name(&mut self, type_id: u64) -> Result<String> {
        if let Some(name) = self.types.get(&type_id) {
            return Ok(name.clone());
        }

        let data = WireWriter::new(self.conn.sizes())
            .reference_type_id(type_id)
            .finish();

        let reply = self
            .conn
            .command(
                command_set::REFERENCE_TYPE,
                command::reference_type::SIGNATURE,
                data,
            )
            .await?;

        let signature = WireReader::new(&reply, self.conn.sizes()).string()?;
        let name = signature_to_name(&signature);

        self.types.insert(type_id, name.clone());

        Ok(name)
    }

    async fn method_name(&mut self, location: &Location) -> Result<MethodName> {
        let class = self.type_name(location.class).await?;

        if !self.methods.contains_key(&location.class) {
            let methods = self.fetch_methods(location.class).await?;
            self.methods.insert(location.class, methods);
        }

        let name = self
            .methods
            .get(&location.class)
            .and_then(|methods| methods.get(&location.method))
            .cloned()
            .unwrap_or_else(|| format!("<method {:#x}>", location.method));

        Ok(MethodName::new(class, name))
    }

    async fn fetch_methods(&mut self, type_id: u64) -> Result<HashMap<u64, String>> {
        let data = WireWriter::new(self.conn.sizes())
            .reference_type_id(type_id)
            .finish();

        let reply = self
            .conn
            .command(
                command_set::REFERENCE_TYPE,
                command::reference_type::METHODS,
                data,
            )
            .await?;

        let mut r = WireReader::new(&reply, self.conn.sizes());

        (0..r.i32()?)
            .map(|_| -> Result<(u64, String)> {
                let id = r.method_id()?;
                let name = r.string()?;
                let _signature = r.string()?;
                let _modifiers = r.i32()?;
                Ok((id, name))
            })
            .collect()
    }

    async fn declared_fields_of(&mut self, type_id: u64) -> Result<&[FieldRef]> {
        if !self.fields.contains_key(&type_id) {
            let fields = self.fetch_fields(type_id).await?;
            self.fields.insert(type_id, fields);
        }

        Ok(self.fields.get(&type_id).map_or(&[][..], Vec::as_slice))
    }

    async fn fetch_fields(&mut self, type_id: u64) -> Result<Vec<FieldRef>> {
        let data = WireWriter::new(self.conn.sizes())
            .reference_type_id(type_id)
            .finish();

        let reply = self
            .conn
            .command(
                command_set::REFERENCE_TYPE,
                command::reference_type::FIELDS,
                data,
            )
            .await?;

        let mut r = WireReader::new(&reply, self.conn.sizes());

        (0..r.i32()?)
            .map(|_| -> Result<FieldRef> {
                let id = r.field_id()?;
                let name = r.string()?;
                let _signature = r.string()?;
                let _modifiers = r.i32()?;
                Ok(FieldRef {
                    class: type_id,
                    id,
                    name,
                })
            })
            .collect()
    }

    async fn field_name(&mut self, type_id: u64, field_id: u64) -> Result<String> {
        let name = self
            .declared_fields_of(type_id)
            .await?
            .iter()
            .find(|field| field.id == field_id)
            .map(|field| field.name.clone())
            .unwrap_or_else(|| format!("<field {field_id:#x}>"));

        Ok(name)
    }

    /// Renders a location as `Class:line`, or `Class.method()+index` when the
    /// method has no line information.
    async fn render_location(&mut self, location: &Location) -> Result<String> {
        let key = (location.class, location.method);

        if !self.lines.contains_key(&key) {
            let lines = self.fetch_line_table(location).await?;
            self.lines.insert(key, lines);
        }

        let line = self.lines.get(&key).and_then(|lines| {
            lines
                .iter()
                .take_while(|(index, _)| *index <= location.index)
                .last()
                .map(|&(_, line)| line)
        });

        match line {
            Some(line) => {
                let class = self.type_name(location.class).await?;
                Ok(format!("{class}:{line}"))
            }
            None => {
                let method = self.method_name(location).await?;
                Ok(format!("{method}()+{}", location.index))
            }
        }
    }

    async fn fetch_line_table(&mut self, location: &Location) -> Result<Vec<(u64, i32)>> {
        let data = WireWriter::new(self.conn.sizes())
            .reference_type_id(location.class)
            .method_id(location.method)
            .finish();

        let reply = self
            .conn
            .command(command_set::METHOD, command::method::LINE_TABLE, data)
            .await;

        let reply = match reply {
            Ok(reply) => reply,
            Err(Error::Command {
                code: ABSENT_INFORMATION | NATIVE_METHOD,
                ..
            }) => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut r = WireReader::new(&reply, self.conn.sizes());

        let _start = r.u64()?;
        let _end = r.u64()?;

        let mut lines = (0..r.i32()?)
            .map(|_| -> Result<(u64, i32)> { Ok((r.u64()?, r.i32()?)) })
            .collect::<Result<Vec<_>>>()?;

        lines.sort_unstable();

        Ok(lines)
    }

    /// Renders a value the way a Java debugger prints it.
    async fn render_value(&mut self, value: Value) -> Result<String> {
        let text = match value {
            Value::Void => "<void value>".to_owned(),
            Value::Boolean(v) => v.to_string(),
            Value::Byte(v) => v.to_string(),
            Value::Char(v) => char::from_u32(v.into())
                .map_or_else(|| format!("\\u{v:04x}"), String::from),
            Value::Short(v) => v.to_string(),
            Value::Int(v) => v.to_string(),
            Value::Long(v) => v.to_string(),
            Value::Float(v) => format!("{v:?}"),
            Value::Double(v) => format!("{v:?}"),
            Value::Object { id: 0, .. } => "null".to_owned(),
            Value::Object {
                tag: tag::STRING,
                id,
            } => format!("\"{}\"", self.string_value(id).await?),
            Value::Object { id, .. } => self.render_object(id).await?,
        };

        Ok(text)
    }

    async fn string_value(&mut self, object_id: u64) -> Result<String> {
        let data = WireWriter::new(self.conn.sizes()).object_id(object_id).finish();

        let reply = self
            .conn
            .command(
                command_set::STRING_REFERENCE,
                command::string_reference::VALUE,
                data,
            )
            .await?;

        Ok(WireReader::new(&reply, self.conn.sizes()).string()?)
    }

    /// Renders an object as `instance of <Type>(id=<n>)`.
    async fn render_object(&mut self, object_id: u64) -> Result<String> {
        if object_id == 0 {
            return Ok("null".to_owned());
        }

        let data = WireWriter::new(self.conn.sizes()).object_id(object_id).finish();

        let reply = self
            .conn
            .command(
                command_set::OBJECT_REFERENCE,
                command::object_reference::REFERENCE_TYPE,
                data,
            )
            .await?;

        let mut r = WireReader::new(&reply, self.conn.sizes());
        let _type_tag = r.u8()?;
        let type_id = r.reference_type_id()?;

        let name = self.type_name(type_id).await?;

        Ok(format!("instance of {name}(id={object_id})"))
    }

    async fn set_request(
        &mut self,
        kind: u8,
        policy: SuspendPolicy,
        modifiers: &[Modifier<'_>],
    ) -> Result<RequestId> {
        let mut w = WireWriter::new(self.conn.sizes());

        w.u8(kind)
            .u8(encode_policy(policy))
            .i32(modifiers.len() as i32);

        for modifier in modifiers {
            modifier.encode(&mut w);
        }

        let data = w.finish();

        let reply = self
            .conn
            .command(command_set::EVENT_REQUEST, command::event_request::SET, data)
            .await?;

        let id = WireReader::new(&reply, self.conn.sizes()).i32()?;

        tracing::trace!(kind, id, ?policy, "event request set");

        Ok(RequestId { kind, id })
    }

    async fn thread_command(&mut self, thread: u64, command: u8) -> Result<tokio_util::bytes::Bytes> {
        let data = WireWriter::new(self.conn.sizes()).object_id(thread).finish();

        self.conn
            .command(command_set::THREAD_REFERENCE, command, data)
            .await
    }
}

impl DebugSession for JdwpSession {
    type Thread = ThreadRef;
    type Class = ClassRef;
    type Field = FieldRef;
    type RequestId = RequestId;
    type Release = Release;
    type Error = Error;

    async fn next_batch(&mut self) -> Result<BatchWait<Self>> {
        let packet = match tokio::time::timeout(self.wait_interval, self.conn.next_event()).await {
            Ok(Some(packet)) => packet,
            Ok(None) => {
                self.log_launched_exit();
                return Ok(BatchWait::Ended);
            }
            Err(_) => return Ok(BatchWait::Interrupted),
        };

        let composite = Composite::decode(&packet.data, self.conn.sizes())?;

        let release = Release {
            policy: composite.suspend_policy,
            thread: composite.events.iter().find_map(JdwpEvent::thread),
        };

        let mut events = Vec::with_capacity(composite.events.len());

        // untranslatable events are dropped, the batch itself always
        // reaches the dispatcher
        for event in composite.events {
            let kind = event.kind();

            match self.translate(event).await {
                Ok(event) => events.push(event),
                Err(e) => tracing::warn!(kind, error = %e, "dropped untranslatable event"),
            }
        }

        Ok(BatchWait::Batch(EventBatch {
            suspend_policy: composite.suspend_policy,
            events,
            release,
        }))
    }

    async fn release(&mut self, release: Self::Release) -> Result<()> {
        if !release.policy.suspends() {
            return Ok(());
        }

        match (release.policy, release.thread) {
            (SuspendPolicy::EventThread, Some(thread)) => {
                self.thread_command(thread, command::thread_reference::RESUME)
                    .await?;
                Ok(())
            }
            (SuspendPolicy::EventThread, None) => {
                tracing::warn!("event thread batch without a thread, resuming every thread");
                self.resume_all().await
            }
            _ => self.resume_all().await,
        }
    }

    async fn resume_all(&mut self) -> Result<()> {
        self.conn
            .command(command_set::VIRTUAL_MACHINE, command::vm::RESUME, Vec::new())
            .await?;

        Ok(())
    }

    async fn thread_name(&mut self, thread: &ThreadRef) -> Result<String> {
        let reply = self
            .thread_command(thread.0, command::thread_reference::NAME)
            .await?;

        Ok(WireReader::new(&reply, self.conn.sizes()).string()?)
    }

    async fn frame_count(&mut self, thread: &ThreadRef) -> Result<usize> {
        let reply = self
            .thread_command(thread.0, command::thread_reference::FRAME_COUNT)
            .await?;

        let count = WireReader::new(&reply, self.conn.sizes()).i32()?;

        Ok(usize::try_from(count).unwrap_or_default())
    }

    async fn declared_fields(&mut self, class: &ClassRef) -> Result<Vec<FieldRef>> {
        Ok(self.declared_fields_of(class.id).await?.to_vec())
    }

    async fn request_exceptions(&mut self, policy: SuspendPolicy) -> Result<RequestId> {
        let modifiers = [Modifier::ExceptionOnly {
            caught: true,
            uncaught: true,
        }];

        self.set_request(event_kind::EXCEPTION, policy, &modifiers)
            .await
    }

    async fn request_method_entries(
        &mut self,
        exclusions: &[String],
        policy: SuspendPolicy,
    ) -> Result<RequestId> {
        let modifiers = class_exclusions(exclusions).collect::<Vec<_>>();

        self.set_request(event_kind::METHOD_ENTRY, policy, &modifiers)
            .await
    }

    async fn request_method_exits(
        &mut self,
        exclusions: &[String],
        policy: SuspendPolicy,
    ) -> Result<RequestId> {
        let modifiers = class_exclusions(exclusions).collect::<Vec<_>>();

        self.set_request(event_kind::METHOD_EXIT, policy, &modifiers)
            .await
    }

    async fn request_thread_deaths(&mut self, policy: SuspendPolicy) -> Result<RequestId> {
        self.set_request(event_kind::THREAD_DEATH, policy, &[]).await
    }

    async fn request_class_prepares(
        &mut self,
        exclusions: &[String],
        policy: SuspendPolicy,
    ) -> Result<RequestId> {
        let modifiers = class_exclusions(exclusions).collect::<Vec<_>>();

        self.set_request(event_kind::CLASS_PREPARE, policy, &modifiers)
            .await
    }

    async fn watch_field_modification(
        &mut self,
        field: &FieldRef,
        exclusions: &[String],
        policy: SuspendPolicy,
    ) -> Result<RequestId> {
        let mut modifiers = vec![Modifier::FieldOnly {
            class: field.class,
            field: field.id,
        }];
        modifiers.extend(class_exclusions(exclusions));

        self.set_request(event_kind::FIELD_MODIFICATION, policy, &modifiers)
            .await
    }

    async fn request_single_step(
        &mut self,
        thread: &ThreadRef,
        policy: SuspendPolicy,
    ) -> Result<RequestId> {
        let modifiers = [
            Modifier::Step {
                thread: thread.0,
                size: step::SIZE_MIN,
                depth: step::DEPTH_INTO,
            },
            Modifier::Count(1),
        ];

        self.set_request(event_kind::SINGLE_STEP, policy, &modifiers)
            .await
    }

    async fn clear_request(&mut self, request: RequestId) -> Result<()> {
        let data = WireWriter::new(self.conn.sizes())
            .u8(request.kind)
            .i32(request.id)
            .finish();

        self.conn
            .command(command_set::EVENT_REQUEST, command::event_request::CLEAR, data)
            .await?;

        Ok(())
    }
}

fn class_exclusions(exclusions: &[String]) -> impl Iterator<Item = Modifier<'_>> {
    exclusions
        .iter()
        .map(|pattern| Modifier::ClassExclude(pattern))
}

const fn encode_policy(policy: SuspendPolicy) -> u8 {
    match policy {
        SuspendPolicy::None => suspend_policy::NONE,
        SuspendPolicy::EventThread => suspend_policy::EVENT_THREAD,
        SuspendPolicy::All => suspend_policy::ALL,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use jtrace_tracer::debugger::{BatchWait, DebugSession, SuspendPolicy};
    use test_log::test;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    use super::{JdwpSession, Modifier, encode_policy};
    use crate::common::connection::Connection;
    use crate::protocol::{HANDSHAKE, IdSizes, WireWriter};

    /// Reads a whole command packet sent by the debugger.
    async fn read_command(stream: &mut TcpStream) -> Vec<u8> {
        let mut packet = vec![0; 4];
        stream.read_exact(&mut packet).await.expect("read length");

        let len = u32::from_be_bytes([packet[0], packet[1], packet[2], packet[3]]);
        packet.resize(len as usize, 0);
        stream.read_exact(&mut packet[4..]).await.expect("read packet");

        packet
    }

    /// Builds the reply to `command`.
    fn reply(command: &[u8], error_code: u16, data: &[u8]) -> Vec<u8> {
        let len = 11 + data.len() as u32;

        let mut reply = Vec::new();
        reply.extend_from_slice(&len.to_be_bytes());
        reply.extend_from_slice(&command[4..8]);
        reply.push(0x80);
        reply.extend_from_slice(&error_code.to_be_bytes());
        reply.extend_from_slice(data);
        reply
    }

    /// Composite packet holding a method entry of thread 7, suspending it.
    fn method_entry_composite() -> Vec<u8> {
        let mut data = vec![1];
        data.extend_from_slice(&1i32.to_be_bytes());
        data.push(40);
        data.extend_from_slice(&1i32.to_be_bytes());
        data.extend_from_slice(&7u64.to_be_bytes());
        data.push(1);
        data.extend_from_slice(&3u64.to_be_bytes());
        data.extend_from_slice(&4u64.to_be_bytes());
        data.extend_from_slice(&0u64.to_be_bytes());

        let mut packet = Vec::new();
        packet.extend_from_slice(&(11 + data.len() as u32).to_be_bytes());
        packet.extend_from_slice(&100u32.to_be_bytes());
        packet.extend_from_slice(&[0, 64, 100]);
        packet.extend_from_slice(&data);
        packet
    }

    #[test(tokio::test)]
    async fn untranslatable_event_still_releases_batch() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let address = listener.local_addr().expect("local address");

        let debuggee = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.expect("accept");

            let mut handshake = [0; 14];
            stream.read_exact(&mut handshake).await.expect("read handshake");
            stream.write_all(HANDSHAKE).await.expect("write handshake");

            let command = read_command(&mut stream).await;
            assert_eq!(&command[9..11], &[1, 7]);
            let sizes = [8i32.to_be_bytes(); 5].concat();
            stream
                .write_all(&reply(&command, 0, &sizes))
                .await
                .expect("write id sizes");

            stream
                .write_all(&method_entry_composite())
                .await
                .expect("write composite");

            // the class went away: INVALID_CLASS
            let command = read_command(&mut stream).await;
            assert_eq!(&command[9..11], &[2, 1]);
            stream
                .write_all(&reply(&command, 21, &[]))
                .await
                .expect("write error reply");

            let command = read_command(&mut stream).await;
            assert_eq!(&command[9..11], &[11, 3]);
            assert_eq!(&command[11..], &7u64.to_be_bytes());
            stream
                .write_all(&reply(&command, 0, &[]))
                .await
                .expect("write resume reply");
        });

        let (reader, writer) = TcpStream::connect(address)
            .await
            .expect("connect")
            .into_split();
        let conn = Connection::establish(reader, writer)
            .await
            .expect("establish");

        let mut session = JdwpSession::new(conn, Duration::from_secs(5), None);

        let Ok(BatchWait::Batch(batch)) = session.next_batch().await else {
            unreachable!("expected a batch");
        };

        assert_eq!(batch.suspend_policy, SuspendPolicy::EventThread);
        assert!(batch.events.is_empty());

        session.release(batch.release).await.expect("release");

        debuggee.await.expect("debuggee");
    }

    #[test]
    fn encode_step_modifiers() {
        let sizes = IdSizes {
            object: 4,
            ..IdSizes::default()
        };

        let mut w = WireWriter::new(&sizes);

        Modifier::Step {
            thread: 9,
            size: 0,
            depth: 0,
        }
        .encode(&mut w);
        Modifier::Count(1).encode(&mut w);

        assert_eq!(
            w.finish(),
            [10, 0, 0, 0, 9, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 1]
        );
    }

    #[test]
    fn encode_class_exclusion() {
        let sizes = IdSizes::default();
        let mut w = WireWriter::new(&sizes);

        Modifier::ClassExclude("java.*").encode(&mut w);

        assert_eq!(w.finish(), [6, 0, 0, 0, 6, b'j', b'a', b'v', b'a', b'.', b'*']);
    }

    #[test]
    fn suspend_policies() {
        assert_eq!(encode_policy(SuspendPolicy::None), 0);
        assert_eq!(encode_policy(SuspendPolicy::EventThread), 1);
        assert_eq!(encode_policy(SuspendPolicy::All), 2);
    }
}
