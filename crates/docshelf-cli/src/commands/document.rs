//! Document command handlers

use std::path::PathBuf;

use anyhow::Result;

use docshelf_core::Library;

use crate::output::Output;
use crate::platform::{PathPicker, SystemShare};
use crate::prompt::confirm;

/// List all documents, optionally filtered by name
pub fn list(library: &Library, query: Option<String>, output: &Output) -> Result<()> {
    let docs = match query {
        Some(ref q) => library.documents().search(q)?,
        None => library.documents().list()?,
    };

    output.print_documents(&docs);
    Ok(())
}

/// Search documents by name
pub fn search(library: &Library, query: String, output: &Output) -> Result<()> {
    let docs = library.documents().search(&query)?;
    output.print_documents(&docs);
    Ok(())
}

/// Import a file into the library
pub fn add(library: &Library, path: PathBuf, output: &Output) -> Result<()> {
    let picker = PathPicker::new(path);
    match library.documents().import(&picker)? {
        Some(doc) => {
            output.success(&format!("Added document: {}", doc.name));
            if !output.is_quiet() {
                output.print_document(&doc);
            }
        }
        None => output.message("Nothing imported."),
    }
    Ok(())
}

/// Show a single document
pub fn show(library: &Library, id: String, output: &Output) -> Result<()> {
    let doc = library.documents().open(&id)?;
    output.print_document(&doc);
    Ok(())
}

/// Open a document with the system handler
pub fn share(library: &Library, id: String, output: &Output) -> Result<()> {
    library.documents().share(&id, &SystemShare)?;
    output.success(&format!("Shared document: {}", id));
    Ok(())
}

/// Delete a document
pub fn delete(library: &Library, id: String, yes: bool, output: &Output) -> Result<()> {
    let doc = library.documents().get(&id)?;

    // Confirm deletion
    if !yes && output.should_prompt() {
        println!("Delete document: {}", doc.name);
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    library.documents().remove(&doc.id)?;
    output.success(&format!("Deleted document: {}", doc.name));
    Ok(())
}

/// Delete every document
pub fn clear(library: &Library, yes: bool, output: &Output) -> Result<()> {
    if !yes {
        if !output.should_prompt() {
            anyhow::bail!("Refusing to delete all documents without --yes");
        }
        let count = library.documents().list()?.len();
        if count == 0 {
            output.message("No documents to delete.");
            return Ok(());
        }
        println!("This will permanently delete {} document(s).", count);
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let removed = library.documents().clear_all()?;
    output.success(&format!("Deleted {} document(s)", removed));
    Ok(())
}
