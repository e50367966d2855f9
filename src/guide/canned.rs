//! Keyword-matched canned answers

use async_trait::async_trait;

use super::{last_user_turn, ChatTurn, Guide, GuideError};

const GAS_LEAK: &str = "\
🚨 **URGENT: Zone D gas leak response**

**Immediate actions:**
1. Evacuate every worker in Zone D (emergency exit: north door)
2. Call the central control room (ext. 100)
3. Check and close the gas shut-off valves

**Protective equipment:**
- Gas mask mandatory
- Anti-static gloves
- No open flames

**Evacuation route:**
Zone D → north emergency exit → Zone E assembly point

**Contacts:**
- Central control room: ext. 100
- Fire department: 119
- Safety team: ext. 200";

const FIRE: &str = "\
🔥 **URGENT: Zone B fire response**

**Immediate actions:**
1. Raise the fire alarm
2. Cut power to Zone B
3. Attempt initial suppression with an extinguisher
4. Evacuate immediately if it cannot be contained

**Evacuation route:**
Zone B turbine hall → west emergency stairs → 1F main gate → parking assembly point

**Extinguishers:**
- Turbine hall 1F entrance (powder)
- Inside the control room (CO2)
- Emergency stair entrance (powder)

**Contacts:**
- Fire department: 119
- Central control room: ext. 100
- Medical team: ext. 119";

const FALLEN_WORKER: &str = "\
🏥 **URGENT: Zone C medical emergency response**

**Immediate actions:**
1. Call the medical team (ext. 119)
2. Check consciousness, breathing and pulse
3. Secure the airway and keep the patient stable
4. Prepare the AED (Zone C entrance wall)

**First aid:**
- Unconscious: recovery position
- Not breathing: start CPR
- Bleeding: apply direct pressure

**AED location:**
Zone C substation entrance wall (red cabinet)

**Contacts:**
- Medical team: ext. 119
- Ambulance: 119
- Safety team: ext. 200";

const NO_HELMET: &str = "\
⛑️ **NOTICE: Zone A missing helmet response**

**Immediate actions:**
1. Identify the worker and instruct them to wear a helmet
2. Issue a spare helmet if none is available
3. Recommend safety training on repeat violations

**Helmet storage:**
- Zone A entrance safety locker
- Administration building safety office

**Recommendations:**
- Check safety gear before every shift
- Always fasten the chin strap

**Contacts:**
- Safety team: ext. 200";

const DEFAULT: &str = "\
📋 **AI safety guide**

Here is some general information about the plant.

**Zones:**
- Zone A: Boiler house
- Zone B: Turbine hall
- Zone C: Substation
- Zone D: Fuel storage
- Zone E: Cooling tower
- Zone F: Administration

**Emergency contacts:**
- Central control room: ext. 100
- Fire department: 119
- Medical team: ext. 119
- Safety team: ext. 200

Describe the situation (gas leak, fire, fallen worker, missing helmet, ...) for specific response guidance.";

/// (keywords, answer); first match wins
const RULES: &[(&[&str], &str)] = &[
    (&["gas", "leak"], GAS_LEAK),
    (&["fire", "smoke", "flame"], FIRE),
    (&["fallen", "collapse", "unconscious", "emergency"], FALLEN_WORKER),
    (&["helmet", "hard hat", "hardhat"], NO_HELMET),
];

/// Offline guide answering from a fixed playbook
#[derive(Debug, Default, Clone, Copy)]
pub struct CannedGuide;

impl CannedGuide {
    pub fn new() -> Self {
        Self
    }

    pub fn answer(question: &str) -> &'static str {
        let question = question.to_lowercase();
        RULES
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|k| question.contains(k)))
            .map(|(_, answer)| *answer)
            .unwrap_or(DEFAULT)
    }
}

#[async_trait]
impl Guide for CannedGuide {
    async fn complete(&self, turns: &[ChatTurn]) -> Result<String, GuideError> {
        let turn = last_user_turn(turns)?;
        Ok(Self::answer(&turn.content).to_string())
    }
}
