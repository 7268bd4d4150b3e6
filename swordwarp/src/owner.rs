/// Globally-unique identifier for anything the weapon can be attached to
/// (the player's hand, a static surface, an enemy).
///
/// Collision sources report struck objects by their per-kind id only. Packing the kind next to
/// the id gives one key space for anchor lookups without cross-kind collisions.
///
/// # Bit layout
/// (least-significant bit = bit 0)
///
/// - bits 0..=31  : `owner_id` (u32)
/// - bits 32..=39 : `OwnerKind` tag (u8)
/// - bits 40..=63 : reserved (must be zero)
pub type Owner = u64;

/// Per-kind identifier (e.g. a collider id handed out by the physics engine).
pub type OwnerId = u32;

/// Discriminator for the kind of object referenced by an [`Owner`].
///
/// The numeric values are part of the packed format. Do not reorder or reuse them.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OwnerKind {
    Player = 1,
    Surface = 2,
    Enemy = 3,
}

/// Packs an [`OwnerKind`] and a per-kind `owner_id` into a globally-unique [`Owner`].
pub const fn pack_owner(id: OwnerId, kind: OwnerKind) -> Owner {
    (id as u64) | ((kind as u64) << OwnerId::BITS)
}

/// Extracts the [OwnerKind] from an [`Owner`].
///
/// Returns `None` if the tag is unknown.
pub fn try_unpack_owner_kind(owner: Owner) -> Option<OwnerKind> {
    const KIND_MASK: u64 = u8::MAX as u64;
    let tag = ((owner >> OwnerId::BITS) & KIND_MASK) as u8;

    match tag {
        1u8 => Some(OwnerKind::Player),
        2u8 => Some(OwnerKind::Surface),
        3u8 => Some(OwnerKind::Enemy),
        _ => None,
    }
}

/// Extracts the [OwnerId] from an [`Owner`]. Does not validate the kind tag.
pub fn unpack_owner_id(owner: Owner) -> OwnerId {
    const ID_MASK: u64 = u32::MAX as u64;
    (owner & ID_MASK) as OwnerId
}

/// Validates that an [`Owner`] conforms to the packing contract.
pub fn validate_owner(owner: Owner) -> Result<(), &'static str> {
    const RESERVED_MASK: u64 = !0u64 << 40;
    if (owner & RESERVED_MASK) != 0 {
        return Err("Owner reserved bits are non-zero");
    }
    if try_unpack_owner_kind(owner).is_none() {
        return Err("Owner has unknown kind tag");
    }
    Ok(())
}
