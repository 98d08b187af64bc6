//! Configuration menu tree
//!
//! A static tree of configuration screens built once at startup from the
//! denomination names in the loaded configuration. Nodes live in an
//! index-addressed arena; a node is either a branch (submenu with a
//! scroll cursor) or a leaf (an effect on the configuration document).
//! The tree's structure never changes after construction; the only
//! mutable state is each branch's scroll cursor.
//!
//! Two rows are visible at a time. Selecting the first visible entry at
//! the top of a branch activates the synthetic `Back` leaf, which ascends
//! (or leaves the menu entirely at the root). Leaf effects write through
//! to the configuration store before returning.

use core::fmt::Write;

use heapless::{String, Vec};

use crate::config::{Denomination, DenominationGroup, WeightsConfig, MAX_DENOMINATIONS};
use crate::traits::{
    ConfigStore, StoreError, DISPLAY_COLS, SCROLL_DOWN_GLYPH, SCROLL_UP_GLYPH,
};
use crate::units::Unit;

/// Arena capacity; the default configuration uses 43 nodes
pub const MAX_MENU_NODES: usize = 64;
/// Children per branch: one leaf per denomination plus `Back`
pub const MAX_MENU_CHILDREN: usize = MAX_DENOMINATIONS + 1;
/// Longest branch or leaf title
pub const MAX_TITLE_LEN: usize = 12;

const ROW_LEN: usize = DISPLAY_COLS as usize;
const GLYPH_COL: usize = ROW_LEN - 1;

/// Arena index of a menu node
pub type NodeId = usize;

/// What activating a leaf does to the configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuEffect {
    /// Ascend to the parent branch; exits the menu at the root
    Back,
    /// Toggle the plate named by the leaf title
    EditPlate(Unit),
    /// Make the bar named by the leaf title the enabled one
    EditBar(Unit),
    /// Make the collar named by the leaf title the enabled one
    EditCollar(Unit),
}

#[derive(Debug)]
enum Node {
    Branch {
        title: String<MAX_TITLE_LEN>,
        parent: Option<NodeId>,
        children: Vec<NodeId, MAX_MENU_CHILDREN>,
        row: usize,
    },
    Leaf {
        title: String<MAX_TITLE_LEN>,
        effect: MenuEffect,
    },
}

/// Where a selection left the menu cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Selection {
    /// Cursor now rests on this branch
    Stay(NodeId),
    /// The root's `Back` was activated; leave the menu
    Exit,
}

/// The menu tree arena
#[derive(Debug)]
pub struct MenuTree {
    nodes: Vec<Node, MAX_MENU_NODES>,
}

impl MenuTree {
    /// Build the tree from the loaded configuration's denomination names
    ///
    /// Root fans out into one branch per denomination group, each with one
    /// submenu per unit (KG before LB) holding a leaf per denomination in
    /// descending value order.
    pub fn build(weights: &WeightsConfig) -> Self {
        let mut tree = Self { nodes: Vec::new() };

        let root = tree.push(Node::Branch {
            title: make_title("Home"),
            parent: None,
            children: Vec::new(),
            row: 0,
        });
        tree.add_leaf(root, "Back", MenuEffect::Back);

        let groups = [
            ("Edit plates", DenominationGroup::Plates),
            ("Edit bars", DenominationGroup::Bars),
            ("Edit collars", DenominationGroup::Collars),
        ];
        for (group_title, group) in groups {
            let group_branch = tree.add_branch(root, group_title);
            for unit in WeightsConfig::MENU_UNITS {
                let unit_branch = tree.add_branch(group_branch, unit.label());
                let effect = match group {
                    DenominationGroup::Plates => MenuEffect::EditPlate(unit),
                    DenominationGroup::Bars => MenuEffect::EditBar(unit),
                    DenominationGroup::Collars => MenuEffect::EditCollar(unit),
                };

                let mut entries: Vec<&Denomination, MAX_DENOMINATIONS> =
                    weights.unit(unit).group(group).iter().collect();
                entries.sort_unstable_by(|a, b| b.value.cmp(&a.value));
                for denom in entries {
                    tree.add_leaf(unit_branch, denom.name.as_str(), effect);
                }
            }
        }
        tree
    }

    /// The tree root
    pub fn root(&self) -> NodeId {
        0
    }

    /// Title of any node
    pub fn title(&self, node: NodeId) -> &str {
        match &self.nodes[node] {
            Node::Branch { title, .. } => title.as_str(),
            Node::Leaf { title, .. } => title.as_str(),
        }
    }

    /// Activate the visible entry at `offset` (0 = first row, 1 = second)
    ///
    /// Branches descend, `Back` ascends (exiting at the root), and edit
    /// leaves apply their effect to the store and keep the cursor in
    /// place. Offsets past the last child are ignored.
    pub fn select<C: ConfigStore>(
        &mut self,
        cursor: NodeId,
        offset: usize,
        store: &mut C,
    ) -> Result<Selection, StoreError> {
        let (child, parent) = match &self.nodes[cursor] {
            Node::Branch {
                children,
                row,
                parent,
                ..
            } => match children.get(row + offset) {
                Some(&child) => (child, *parent),
                None => return Ok(Selection::Stay(cursor)),
            },
            Node::Leaf { .. } => return Ok(Selection::Stay(cursor)),
        };

        match &self.nodes[child] {
            Node::Branch { .. } => Ok(Selection::Stay(child)),
            Node::Leaf { effect, title } => match effect {
                MenuEffect::Back => match parent {
                    Some(parent) => Ok(Selection::Stay(parent)),
                    None => Ok(Selection::Exit),
                },
                effect => {
                    run_effect(*effect, title.as_str(), store)?;
                    Ok(Selection::Stay(cursor))
                }
            },
        }
    }

    /// Move the scroll window up one row
    pub fn scroll_up(&mut self, cursor: NodeId) {
        if let Node::Branch { row, .. } = &mut self.nodes[cursor] {
            *row = row.saturating_sub(1);
        }
    }

    /// Move the scroll window down one row, keeping two entries visible
    pub fn scroll_down(&mut self, cursor: NodeId) {
        if let Node::Branch { children, row, .. } = &mut self.nodes[cursor] {
            if *row < children.len().saturating_sub(2) {
                *row += 1;
            }
        }
    }

    /// Render the two visible rows at a branch
    ///
    /// Entries are numbered `1:` / `2:`; leaf titles gain a ` *` marker
    /// when the denomination they name is enabled. Scroll glyphs occupy
    /// the last column when more entries exist in that direction.
    pub fn render_rows<C: ConfigStore>(
        &self,
        cursor: NodeId,
        store: &C,
    ) -> [String<ROW_LEN>; 2] {
        let mut rows = [String::new(), String::new()];
        let (children, row) = match &self.nodes[cursor] {
            Node::Branch { children, row, .. } => (children, *row),
            Node::Leaf { .. } => return rows,
        };

        for (slot, line) in rows.iter_mut().enumerate() {
            let child = match children.get(row + slot) {
                Some(&child) => child,
                None => continue,
            };
            let _ = write!(line, "{}: {}", slot + 1, self.title(child));
            if let Node::Leaf { effect, title } = &self.nodes[child] {
                if effect_enabled(*effect, title.as_str(), store) {
                    let _ = line.push_str(" *");
                }
            }
        }

        if row > 0 {
            pad_to(&mut rows[0], GLYPH_COL);
            let _ = rows[0].push(SCROLL_UP_GLYPH);
        }
        if row + 2 < children.len() {
            pad_to(&mut rows[1], GLYPH_COL);
            let _ = rows[1].push(SCROLL_DOWN_GLYPH);
        }
        rows
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = self.nodes.len();
        debug_assert!(id < MAX_MENU_NODES);
        let _ = self.nodes.push(node);
        id
    }

    /// New branch under `parent`, seeded with its `Back` leaf
    fn add_branch(&mut self, parent: NodeId, title: &str) -> NodeId {
        let id = self.push(Node::Branch {
            title: make_title(title),
            parent: Some(parent),
            children: Vec::new(),
            row: 0,
        });
        self.link(parent, id);
        self.add_leaf(id, "Back", MenuEffect::Back);
        id
    }

    fn add_leaf(&mut self, parent: NodeId, title: &str, effect: MenuEffect) -> NodeId {
        let id = self.push(Node::Leaf {
            title: make_title(title),
            effect,
        });
        self.link(parent, id);
        id
    }

    fn link(&mut self, parent: NodeId, child: NodeId) {
        if let Node::Branch { children, .. } = &mut self.nodes[parent] {
            let _ = children.push(child);
        }
    }
}

/// Apply an edit leaf's effect, persisting when anything changed
fn run_effect<C: ConfigStore>(
    effect: MenuEffect,
    name: &str,
    store: &mut C,
) -> Result<(), StoreError> {
    let mut weights = store.weights().clone();
    let changed = match effect {
        MenuEffect::Back => false,
        MenuEffect::EditPlate(unit) => weights.unit_mut(unit).toggle_plate(name),
        MenuEffect::EditBar(unit) => weights.unit_mut(unit).select_bar(name),
        MenuEffect::EditCollar(unit) => weights.unit_mut(unit).select_collar(name),
    };
    if changed {
        store.write_weights(weights)?;
    }
    Ok(())
}

fn effect_enabled<C: ConfigStore>(effect: MenuEffect, name: &str, store: &C) -> bool {
    let (unit, group) = match effect {
        MenuEffect::Back => return false,
        MenuEffect::EditPlate(unit) => (unit, DenominationGroup::Plates),
        MenuEffect::EditBar(unit) => (unit, DenominationGroup::Bars),
        MenuEffect::EditCollar(unit) => (unit, DenominationGroup::Collars),
    };
    store.weights().unit(unit).is_using(group, name)
}

fn make_title(s: &str) -> String<MAX_TITLE_LEN> {
    let mut title = String::new();
    let _ = title.push_str(&s[..s.len().min(MAX_TITLE_LEN)]);
    title
}

fn pad_to(line: &mut String<ROW_LEN>, col: usize) {
    while line.len() < col {
        let _ = line.push(' ');
    }
}
