// src/service/launchd.rs

//! launchd property list rendering

use super::ServiceDescriptor;
use crate::error::{Error, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

const PLIST_DOCTYPE: &str =
    r#"plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd""#;

/// Render a descriptor as an XML property list
///
/// Keys: Label, RunAtLoad, KeepAlive, ProgramArguments (executable first)
/// and WorkingDirectory.
pub fn render_plist(descriptor: &ServiceDescriptor) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    write_plist(&mut writer, descriptor).map_err(|e| Error::Render(e.to_string()))?;

    let mut xml =
        String::from_utf8(writer.into_inner()).map_err(|e| Error::Render(e.to_string()))?;
    xml.push('\n');
    Ok(xml)
}

fn write_plist(
    writer: &mut Writer<Vec<u8>>,
    descriptor: &ServiceDescriptor,
) -> quick_xml::Result<()> {
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::DocType(BytesText::from_escaped(PLIST_DOCTYPE)))?;
    writer.write_event(Event::Start(
        BytesStart::new("plist").with_attributes([("version", "1.0")]),
    ))?;
    writer.write_event(Event::Start(BytesStart::new("dict")))?;

    write_key(writer, "Label")?;
    write_string(writer, &descriptor.label)?;

    write_key(writer, "RunAtLoad")?;
    write_bool(writer, descriptor.run_at_load)?;

    write_key(writer, "KeepAlive")?;
    write_bool(writer, descriptor.keep_alive)?;

    write_key(writer, "ProgramArguments")?;
    writer.write_event(Event::Start(BytesStart::new("array")))?;
    for arg in descriptor.program_arguments() {
        write_string(writer, arg)?;
    }
    writer.write_event(Event::End(BytesEnd::new("array")))?;

    write_key(writer, "WorkingDirectory")?;
    write_string(writer, &descriptor.working_directory)?;

    writer.write_event(Event::End(BytesEnd::new("dict")))?;
    writer.write_event(Event::End(BytesEnd::new("plist")))?;
    Ok(())
}

fn write_key(writer: &mut Writer<Vec<u8>>, key: &str) -> quick_xml::Result<()> {
    write_text_element(writer, "key", key)
}

fn write_string(writer: &mut Writer<Vec<u8>>, value: &str) -> quick_xml::Result<()> {
    write_text_element(writer, "string", value)
}

fn write_bool(writer: &mut Writer<Vec<u8>>, value: bool) -> quick_xml::Result<()> {
    let tag = if value { "true" } else { "false" };
    writer.write_event(Event::Empty(BytesStart::new(tag)))
}

fn write_text_element(
    writer: &mut Writer<Vec<u8>>,
    tag: &str,
    text: &str,
) -> quick_xml::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))
}
